pub mod aggregate;
pub mod extract;
pub mod model;
pub mod summary;

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::classify::Classifier;
use crate::error::IngestError;
use crate::ingest::RawRow;
use extract::StatusFilter;
use model::{AnalysisResult, CallRecord, OutcomeTag};

/// Run the whole pipeline over one batch of rows.
///
/// Each outcome tag is aggregated on its own; problem tags go through the
/// coherence filter, appointment-created calls do not.
pub fn analyze(
    rows: &[RawRow],
    classifier: &Classifier,
    filter: &StatusFilter,
) -> Result<AnalysisResult, IngestError> {
    if rows.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let mut by_tag: BTreeMap<OutcomeTag, Vec<CallRecord>> = BTreeMap::new();
    let mut dropped = 0usize;
    for row in rows {
        match extract::extract(row, filter) {
            Some(record) => by_tag.entry(record.tag).or_default().push(record),
            None => dropped += 1,
        }
    }
    info!(
        "Extracted {} call records from {} rows ({} dropped by status)",
        rows.len() - dropped,
        rows.len(),
        dropped
    );

    let appointments = by_tag.remove(&OutcomeTag::AppointmentCreated).unwrap_or_default();
    let durations = duration_by_call_id(&appointments);

    let mut problems = BTreeMap::new();
    for tag in OutcomeTag::PROBLEMS {
        let mut records = by_tag.remove(&tag).unwrap_or_default();
        attach_durations(&mut records, &durations);
        let stats = aggregate::aggregate(&records, classifier, true);
        debug!("{tag}: {} calls in {} categories", records.len(), stats.len());
        problems.insert(tag, stats);
    }

    let appointment_stats = aggregate::aggregate(&appointments, classifier, false);
    let summary = summary::summarize(&problems, &appointment_stats);
    info!(
        "Analysis done: {} problem calls, {} appointments, {} incoherent labels",
        summary.total_calls, summary.appointments_created, summary.incoherent_count
    );

    Ok(AnalysisResult {
        summary,
        problems,
        appointments: appointment_stats,
    })
}

/// Call id → duration, taken from appointment-created calls. A later row for
/// the same id overrides an earlier one.
fn duration_by_call_id(appointments: &[CallRecord]) -> HashMap<&str, u64> {
    appointments
        .iter()
        .filter_map(|r| r.call_id.as_deref().map(|id| (id, r.duration_seconds)))
        .collect()
}

/// Durations are only recorded on appointment-created rows; a problem call
/// borrows one when the same call id was also booked.
fn attach_durations(records: &mut [CallRecord], durations: &HashMap<&str, u64>) {
    for record in records.iter_mut() {
        record.duration_seconds = record
            .call_id
            .as_deref()
            .and_then(|id| durations.get(id).copied())
            .unwrap_or(0);
    }
}

/// Lenient non-negative integer parse for spreadsheet cells: accepts
/// `45`, ` 45 `, `45.0` and `45,7` (truncated). Anything else is `None`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let s = raw.trim().replace(',', ".");
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u64),
        _ => None,
    }
}
