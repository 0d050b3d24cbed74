use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classify::Category;

/// Outcome of a bot call, as written in the export's `Tag` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    ExamNotFound,
    ExamNotAuthorized,
    /// The bot's own spelling; kept so exports parse as-is.
    #[serde(rename = "availabilies_provided", alias = "availabilities_provided")]
    AvailabilitiesProvided,
    ExamFound,
    MultipleAppointmentsCancelled,
    NoAvailabilitiesFound,
    AppointmentCreated,
}

impl OutcomeTag {
    pub const ALL: [OutcomeTag; 7] = [
        OutcomeTag::ExamNotFound,
        OutcomeTag::ExamNotAuthorized,
        OutcomeTag::AvailabilitiesProvided,
        OutcomeTag::ExamFound,
        OutcomeTag::MultipleAppointmentsCancelled,
        OutcomeTag::NoAvailabilitiesFound,
        OutcomeTag::AppointmentCreated,
    ];

    /// Every tag except [`OutcomeTag::AppointmentCreated`].
    pub const PROBLEMS: [OutcomeTag; 6] = [
        OutcomeTag::ExamNotFound,
        OutcomeTag::ExamNotAuthorized,
        OutcomeTag::AvailabilitiesProvided,
        OutcomeTag::ExamFound,
        OutcomeTag::MultipleAppointmentsCancelled,
        OutcomeTag::NoAvailabilitiesFound,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OutcomeTag::ExamNotFound => "exam_not_found",
            OutcomeTag::ExamNotAuthorized => "exam_not_authorized",
            OutcomeTag::AvailabilitiesProvided => "availabilies_provided",
            OutcomeTag::ExamFound => "exam_found",
            OutcomeTag::MultipleAppointmentsCancelled => "multiple_appointments_cancelled",
            OutcomeTag::NoAvailabilitiesFound => "no_availabilities_found",
            OutcomeTag::AppointmentCreated => "appointment_created",
        }
    }

    /// Short prefix for report detail sheets.
    pub fn prefix(&self) -> &'static str {
        match self {
            OutcomeTag::ExamNotFound => "NF",
            OutcomeTag::ExamNotAuthorized => "NA",
            OutcomeTag::AvailabilitiesProvided => "DP",
            OutcomeTag::ExamFound => "EF",
            OutcomeTag::MultipleAppointmentsCancelled => "AC",
            OutcomeTag::NoAvailabilitiesFound => "PD",
            OutcomeTag::AppointmentCreated => "RDV",
        }
    }

    /// Human label used in reports and the summary.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeTag::ExamNotFound => "Non trouvés",
            OutcomeTag::ExamNotAuthorized => "Non autorisés",
            OutcomeTag::AvailabilitiesProvided => "Dispo proposées",
            OutcomeTag::ExamFound => "Exam trouvé",
            OutcomeTag::MultipleAppointmentsCancelled => "RDV annulés",
            OutcomeTag::NoAvailabilitiesFound => "Pas de dispo",
            OutcomeTag::AppointmentCreated => "Rendez-vous",
        }
    }

    pub fn is_problem(&self) -> bool {
        *self != OutcomeTag::AppointmentCreated
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace('-', "_");
        match key.as_str() {
            "exam_not_found" => Some(OutcomeTag::ExamNotFound),
            "exam_not_authorized" => Some(OutcomeTag::ExamNotAuthorized),
            "availabilies_provided" | "availabilities_provided" => {
                Some(OutcomeTag::AvailabilitiesProvided)
            }
            "exam_found" => Some(OutcomeTag::ExamFound),
            "multiple_appointments_cancelled" => Some(OutcomeTag::MultipleAppointmentsCancelled),
            "no_availabilities_found" => Some(OutcomeTag::NoAvailabilitiesFound),
            "appointment_created" => Some(OutcomeTag::AppointmentCreated),
            _ => None,
        }
    }

    /// Guess a file-level tag from a file name such as `exam_not_found.csv`
    /// or `export-not-authorized-2026.csv`.
    pub fn detect_from_file_name(name: &str) -> Option<Self> {
        let stem = name.to_lowercase().replace(['-', ' ', '.'], "_");
        // exam_not_found must be tested before the shorter not_found alias
        const NEEDLES: [(&str, OutcomeTag); 10] = [
            ("exam_not_found", OutcomeTag::ExamNotFound),
            ("exam_not_authorized", OutcomeTag::ExamNotAuthorized),
            ("no_availabilities_found", OutcomeTag::NoAvailabilitiesFound),
            ("availabilies_provided", OutcomeTag::AvailabilitiesProvided),
            ("availabilities_provided", OutcomeTag::AvailabilitiesProvided),
            ("multiple_appointments_cancelled", OutcomeTag::MultipleAppointmentsCancelled),
            ("appointment_created", OutcomeTag::AppointmentCreated),
            ("exam_found", OutcomeTag::ExamFound),
            ("not_authorized", OutcomeTag::ExamNotAuthorized),
            ("not_found", OutcomeTag::ExamNotFound),
        ];
        NEEDLES
            .iter()
            .find(|(needle, _)| stem.contains(needle))
            .map(|(_, tag)| *tag)
    }
}

impl std::fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One accepted call, reduced to what the aggregation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub call_id: Option<String>,
    pub external_id: Option<String>,
    pub tag: OutcomeTag,
    pub status: String,
    /// First `;`-separated exam of the call, empty when none.
    pub requested_exam_raw: String,
    pub duration_seconds: u64,
}

/// Calls sharing a normalized exam label within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamGroup {
    pub normalized_key: String,
    pub display_name: String,
    pub total: u64,
    pub not_found: u64,
    pub not_authorized: u64,
    pub duration_total: u64,
    pub duration_average: u64,
    pub external_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    pub total: u64,
    pub not_found: u64,
    pub not_authorized: u64,
    pub duration_total: u64,
    pub duration_average: u64,
    /// Calls counted in `total` but not listed in `exams` (too vague, or no label).
    #[serde(default)]
    pub unlisted: u64,
    pub exams: Vec<ExamGroup>,
}

impl CategoryStats {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            total: 0,
            not_found: 0,
            not_authorized: 0,
            duration_total: 0,
            duration_average: 0,
            unlisted: 0,
            exams: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Problem-tag calls, all tags together.
    pub total_calls: u64,
    /// Listed exam groups across problem tags, incoherent labels excluded.
    pub distinct_exams: u64,
    pub categories_found: u64,
    pub incoherent_count: u64,
    /// Appointment-created calls only.
    pub total_duration: u64,
    pub average_duration: u64,
    pub appointments_created: u64,
    pub tag_counts: BTreeMap<OutcomeTag, u64>,
}

impl Summary {
    pub fn tag_count(&self, tag: OutcomeTag) -> u64 {
        self.tag_counts.get(&tag).copied().unwrap_or(0)
    }
}

/// Full output of one run, or of a re-imported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub problems: BTreeMap<OutcomeTag, Vec<CategoryStats>>,
    pub appointments: Vec<CategoryStats>,
}

impl AnalysisResult {
    pub fn problem_stats(&self, tag: OutcomeTag) -> &[CategoryStats] {
        self.problems.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_keys_round_trip() {
        for tag in OutcomeTag::ALL {
            assert_eq!(OutcomeTag::from_str(tag.key()), Some(tag));
        }
        assert_eq!(
            OutcomeTag::from_str(" Exam-Not-Found "),
            Some(OutcomeTag::ExamNotFound)
        );
        assert_eq!(OutcomeTag::from_str("abandoned"), None);
    }

    #[test]
    fn file_names_map_to_tags() {
        assert_eq!(
            OutcomeTag::detect_from_file_name("exam_not_found.csv"),
            Some(OutcomeTag::ExamNotFound)
        );
        assert_eq!(
            OutcomeTag::detect_from_file_name("Export-Not-Authorized-2026.csv"),
            Some(OutcomeTag::ExamNotAuthorized)
        );
        assert_eq!(
            OutcomeTag::detect_from_file_name("no_availabilities_found.json"),
            Some(OutcomeTag::NoAvailabilitiesFound)
        );
        assert_eq!(
            OutcomeTag::detect_from_file_name("exam_found.csv"),
            Some(OutcomeTag::ExamFound)
        );
        assert_eq!(OutcomeTag::detect_from_file_name("allodoct_export.csv"), None);
    }

    #[test]
    fn only_appointment_created_is_a_success() {
        assert_eq!(OutcomeTag::PROBLEMS.len(), 6);
        assert!(OutcomeTag::PROBLEMS.iter().all(OutcomeTag::is_problem));
        assert!(!OutcomeTag::AppointmentCreated.is_problem());
    }

    #[test]
    fn tag_serializes_with_export_spelling() {
        let json = serde_json::to_string(&OutcomeTag::AvailabilitiesProvided).unwrap();
        assert_eq!(json, "\"availabilies_provided\"");
    }
}
