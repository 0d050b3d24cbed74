use tracing::trace;

use super::model::CallRecord;
use super::parse_count;
use crate::ingest::RawRow;

/// Dispositions kept for problem tags. The bot exports French values; the
/// English ones cover translated exports.
pub const DEFAULT_ACCEPTED_STATUSES: [&str; 4] = ["Transféré", "Décroché", "Transferred", "Answered"];

/// Status inclusion rule for problem-tag rows: only calls that reached a
/// human (transferred or picked up) count as problems.
#[derive(Debug, Clone)]
pub struct StatusFilter {
    accepted: Vec<String>,
}

impl StatusFilter {
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: accepted.into_iter().map(|s| s.into().trim().to_string()).collect(),
        }
    }

    pub fn accepts(&self, status: &str) -> bool {
        let status = status.trim();
        self.accepted.iter().any(|a| a == status)
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTED_STATUSES)
    }
}

/// Turn one input row into a call record, or drop it.
///
/// Problem-tag rows must pass the status filter and never carry a duration of
/// their own; appointment-created rows are always kept.
pub fn extract(row: &RawRow, filter: &StatusFilter) -> Option<CallRecord> {
    let problem = row.tag.is_problem();
    if problem && !filter.accepts(&row.status) {
        trace!(
            "Dropping {} row {} of {} (status {:?})",
            row.tag,
            row.line,
            row.source,
            row.status
        );
        return None;
    }

    let duration_seconds = if problem {
        0
    } else {
        row.duration.as_deref().and_then(parse_count).unwrap_or(0)
    };

    Some(CallRecord {
        call_id: clean_id(&row.call_id),
        external_id: clean_id(&row.external_id),
        tag: row.tag,
        status: row.status.trim().to_string(),
        requested_exam_raw: first_exam(&row.exam),
        duration_seconds,
    })
}

/// First non-empty `;`-segment of the identified-exams field, trimmed.
pub fn first_exam(field: &str) -> String {
    field
        .split(';')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Blank ids become `None`; ids that went through a float column
/// (`"123456.0"`) lose their fractional zero.
pub fn clean_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(int_part) = trimmed.strip_suffix(".0") {
        if !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()) {
            return Some(int_part.to_string());
        }
    }
    Some(trimmed.to_string())
}
