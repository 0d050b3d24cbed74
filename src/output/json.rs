use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::model::AnalysisResult;

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// `analyze --json` output: run metadata followed by the result fields.
#[derive(Debug, Serialize)]
pub struct AnalysisEnvelope<'a> {
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub inputs: &'a [String],
    pub policy: &'a str,
    pub rows_read: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<String>,
    #[serde(flatten)]
    pub result: &'a AnalysisResult,
}

impl<'a> AnalysisEnvelope<'a> {
    pub fn new(inputs: &'a [String], policy: &'a str, rows_read: usize, result: &'a AnalysisResult) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now(),
            inputs,
            policy,
            rows_read,
            report_dir: None,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{OutcomeTag, Summary};
    use std::collections::BTreeMap;

    #[test]
    fn envelope_flattens_the_result() {
        let result = AnalysisResult {
            summary: Summary::default(),
            problems: BTreeMap::from([(OutcomeTag::ExamNotFound, Vec::new())]),
            appointments: Vec::new(),
        };
        let inputs = vec!["calls.csv".to_string()];
        let envelope = AnalysisEnvelope::new(&inputs, "terms", 3, &result);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["rows_read"], 3);
        assert_eq!(value["summary"]["total_calls"], 0);
        assert!(value["problems"]["exam_not_found"].is_array());
        assert!(value.get("report_dir").is_none());
    }
}
