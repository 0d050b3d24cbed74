use std::collections::BTreeMap;

use super::model::{CategoryStats, OutcomeTag, Summary};
use crate::classify::Category;

/// Derive the top-level counters. Missing tags or categories count as zero.
pub fn summarize(
    problems: &BTreeMap<OutcomeTag, Vec<CategoryStats>>,
    appointments: &[CategoryStats],
) -> Summary {
    let mut summary = Summary::default();

    for tag in OutcomeTag::PROBLEMS {
        let stats = problems.get(&tag).map(Vec::as_slice).unwrap_or(&[]);
        let tag_total = saturating_sum(stats.iter().map(|s| s.total));
        summary.tag_counts.insert(tag, tag_total);
        summary.total_calls = summary.total_calls.saturating_add(tag_total);
        summary.categories_found += stats.len() as u64;

        for s in stats {
            if s.category == Category::Incoherent {
                summary.incoherent_count = summary.incoherent_count.saturating_add(s.total);
            } else {
                summary.distinct_exams += s.exams.len() as u64;
            }
        }
    }

    summary.appointments_created = saturating_sum(appointments.iter().map(|s| s.total));
    summary.total_duration = saturating_sum(appointments.iter().map(|s| s.duration_total));
    summary.average_duration = if summary.appointments_created == 0 {
        0
    } else {
        summary.total_duration / summary.appointments_created
    };

    summary
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}
