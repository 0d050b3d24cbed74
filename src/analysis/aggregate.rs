use std::collections::{BTreeMap, HashMap};

use super::model::{CallRecord, CategoryStats, ExamGroup, OutcomeTag};
use crate::classify::{clean_display, normalize, Category, Classifier};

/// Group records by category, then by normalized exam label.
///
/// Categories come out in taxonomy order and only when they hold at least one
/// record. Exam groups are sorted by total, descending, first-seen order on
/// ties. With `apply_filter` on, groups whose display label is too vague are
/// left out of the listing but still counted in the category total.
pub fn aggregate(
    records: &[CallRecord],
    classifier: &Classifier,
    apply_filter: bool,
) -> Vec<CategoryStats> {
    let mut by_category: BTreeMap<Category, Vec<&CallRecord>> = BTreeMap::new();
    for record in records {
        let category = classifier.categorize(&record.requested_exam_raw, apply_filter);
        by_category.entry(category).or_default().push(record);
    }

    by_category
        .into_iter()
        .map(|(category, members)| category_stats(category, &members, classifier, apply_filter))
        .collect()
}

/// Records of one exam group, in input order, plus the raw label tally.
struct GroupAccumulator<'a> {
    key: String,
    labels: Vec<(&'a str, u64)>,
    members: Vec<&'a CallRecord>,
}

impl<'a> GroupAccumulator<'a> {
    fn push(&mut self, record: &'a CallRecord) {
        let label = record.requested_exam_raw.as_str();
        match self.labels.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => self.labels.push((label, 1)),
        }
        self.members.push(record);
    }

    /// Most frequent raw label; the earliest seen wins a tie.
    fn mode(&self) -> &'a str {
        let mut best: Option<(&'a str, u64)> = None;
        for &(label, count) in &self.labels {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(l, _)| l).unwrap_or("")
    }
}

fn category_stats(
    category: Category,
    members: &[&CallRecord],
    classifier: &Classifier,
    apply_filter: bool,
) -> CategoryStats {
    let mut stats = CategoryStats::empty(category);
    stats.total = members.len() as u64;
    stats.not_found = count_tag(members, OutcomeTag::ExamNotFound);
    stats.not_authorized = count_tag(members, OutcomeTag::ExamNotAuthorized);
    stats.duration_total = duration_sum(members);
    stats.duration_average = average(stats.duration_total, stats.total);

    let mut groups: Vec<GroupAccumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for &record in members {
        let key = normalize(&record.requested_exam_raw);
        if key.is_empty() {
            stats.unlisted += 1;
            continue;
        }
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupAccumulator {
                key,
                labels: Vec::new(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].push(record);
    }

    for group in groups {
        let display_name = clean_display(group.mode());
        let total = group.members.len() as u64;
        if apply_filter && classifier.is_too_vague(&display_name) {
            stats.unlisted += total;
            continue;
        }
        let duration_total = duration_sum(&group.members);
        stats.exams.push(ExamGroup {
            normalized_key: group.key,
            display_name,
            total,
            not_found: count_tag(&group.members, OutcomeTag::ExamNotFound),
            not_authorized: count_tag(&group.members, OutcomeTag::ExamNotAuthorized),
            duration_total,
            duration_average: average(duration_total, total),
            external_ids: group
                .members
                .iter()
                .filter_map(|r| r.external_id.clone())
                .collect(),
        });
    }

    // stable: equal totals keep first-seen order
    stats.exams.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

fn count_tag(records: &[&CallRecord], tag: OutcomeTag) -> u64 {
    records.iter().filter(|r| r.tag == tag).count() as u64
}

/// Saturating: a duration cell may hold any value up to `u64::MAX`.
fn duration_sum(records: &[&CallRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.duration_seconds))
}

fn average(sum: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        sum / count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(tag: OutcomeTag, exam: &str, ext: &str, duration: u64) -> CallRecord {
        CallRecord {
            call_id: None,
            external_id: if ext.is_empty() { None } else { Some(ext.to_string()) },
            tag,
            status: "Transféré".to_string(),
            requested_exam_raw: exam.to_string(),
            duration_seconds: duration,
        }
    }

    fn nf(exam: &str, ext: &str) -> CallRecord {
        rec(OutcomeTag::ExamNotFound, exam, ext, 0)
    }

    #[test]
    fn labels_with_same_key_merge() {
        let records = vec![nf("Scanner Thoracique", "1"), nf("scanner thoracique.", "2")];
        let stats = aggregate(&records, &Classifier::default(), true);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category, Category::Scanner);
        assert_eq!(stats[0].exams.len(), 1);
        let group = &stats[0].exams[0];
        assert_eq!(group.total, 2);
        assert_eq!(group.normalized_key, "scanner thoracique");
        assert_eq!(group.external_ids, vec!["1", "2"]);
    }

    #[test]
    fn display_name_is_the_first_seen_mode() {
        let records = vec![
            nf("IRM du Genou", "a"),
            nf("irm du genou", "b"),
            nf("IRM du genou.", "c"),
            nf("irm du genou", "d"),
            nf("IRM du Genou", "e"),
        ];
        let stats = aggregate(&records, &Classifier::default(), true);
        // "IRM du Genou" and "irm du genou" both appear twice; the first seen wins
        assert_eq!(stats[0].exams[0].display_name, "IRM du Genou");
        assert_eq!(stats[0].exams[0].total, 5);
    }

    #[test]
    fn categories_follow_taxonomy_order() {
        let records = vec![
            nf("zzz blabla", ""),
            nf("Échographie abdominale", ""),
            nf("", ""),
            nf("IRM du genou", ""),
            nf("biopsie du sein", ""),
        ];
        let stats = aggregate(&records, &Classifier::default(), true);
        let order: Vec<Category> = stats.iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Irm,
                Category::Echographie,
                Category::Incoherent,
                Category::Other,
                Category::Unknown,
            ]
        );
    }

    #[test]
    fn exams_sort_by_total_with_stable_ties() {
        let records = vec![
            nf("IRM du genou", ""),
            nf("IRM du rachis lombaire", ""),
            nf("IRM de la hanche", ""),
            nf("IRM de la hanche", ""),
            nf("IRM du rachis lombaire", ""),
            nf("IRM cérébrale complète", ""),
        ];
        let stats = aggregate(&records, &Classifier::default(), true);
        let names: Vec<&str> = stats[0].exams.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "IRM du rachis lombaire",
                "IRM de la hanche",
                "IRM du genou",
                "IRM cérébrale complète",
            ]
        );
    }

    #[test]
    fn vague_labels_count_but_are_not_listed() {
        let records = vec![
            nf("IRM", "1"),
            nf("irm.", "2"),
            nf("IRM du genou", "3"),
            rec(OutcomeTag::ExamNotAuthorized, "IRM du genou", "4", 0),
        ];
        let stats = aggregate(&records, &Classifier::default(), true);
        let irm = &stats[0];
        assert_eq!(irm.total, 4);
        assert_eq!(irm.unlisted, 2);
        assert_eq!(irm.exams.len(), 1);
        assert_eq!(irm.not_found, 3);
        assert_eq!(irm.not_authorized, 1);
        assert_eq!(irm.exams[0].not_found, 1);
        assert_eq!(irm.exams[0].not_authorized, 1);
        let listed: u64 = irm.exams.iter().map(|e| e.total).sum();
        assert_eq!(irm.total, listed + irm.unlisted);
        assert_eq!(irm.total, irm.not_found + irm.not_authorized);
    }

    #[test]
    fn appointment_listing_keeps_vague_labels() {
        let records = vec![
            rec(OutcomeTag::AppointmentCreated, "IRM", "1", 30),
            rec(OutcomeTag::AppointmentCreated, "irm", "2", 61),
            rec(OutcomeTag::AppointmentCreated, "rdv", "3", 10),
        ];
        let stats = aggregate(&records, &Classifier::default(), false);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, Category::Irm);
        assert_eq!(stats[0].exams[0].total, 2);
        assert_eq!(stats[0].exams[0].duration_total, 91);
        assert_eq!(stats[0].exams[0].duration_average, 45);
        assert_eq!(stats[0].duration_average, 45);
        assert_eq!(stats[1].category, Category::Other);
        assert_eq!(stats[1].exams[0].display_name, "rdv");
        assert!(stats.iter().all(|s| s.category != Category::Incoherent));
    }

    #[test]
    fn huge_durations_saturate() {
        let records = vec![
            rec(OutcomeTag::AppointmentCreated, "IRM du genou", "1", u64::MAX),
            rec(OutcomeTag::AppointmentCreated, "IRM du genou", "2", 10),
        ];
        let stats = aggregate(&records, &Classifier::default(), false);
        assert_eq!(stats[0].duration_total, u64::MAX);
        assert_eq!(stats[0].exams[0].duration_total, u64::MAX);
        assert_eq!(stats[0].exams[0].duration_average, u64::MAX / 2);
    }

    #[test]
    fn unknown_category_lists_nothing() {
        let records = vec![nf("", "1"), nf("  ", "2")];
        let stats = aggregate(&records, &Classifier::default(), true);
        assert_eq!(stats[0].category, Category::Unknown);
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].unlisted, 2);
        assert!(stats[0].exams.is_empty());
    }

    #[test]
    fn empty_input_yields_no_categories() {
        assert!(aggregate(&[], &Classifier::default(), true).is_empty());
    }
}
