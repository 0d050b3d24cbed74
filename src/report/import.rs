use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use super::workbook::{truncate_name, Cell, Sheet, Workbook, SHEET_NAME_MAX};
use super::{split_ids, summary_metric, CATEGORY, METRIC, SUMMARY_SHEET, TOTAL, VALUE};
use crate::analysis::model::{AnalysisResult, CategoryStats, ExamGroup, OutcomeTag, Summary};
use crate::analysis::parse_count;
use crate::analysis::summary::summarize;
use crate::classify::{normalize, Category};
use crate::error::ReportError;

const SPLIT_STATS: &str = "Stats Problèmes";
const SPLIT_PREFIX: &str = "P";
const LEGACY_STATS: &str = "Statistiques";

/// Sheet-naming convention of a report, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportScheme {
    /// `Stats <tag label>` per problem tag, details `<PREFIX>_<CATEGORY>`.
    Tagged,
    /// `Stats Problèmes` for all problem tags, details `P_<CATEGORY>`.
    Split,
    /// `Statistiques` with a title row, details named by category.
    Legacy,
}

impl ReportScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportScheme::Tagged => "tagged",
            ReportScheme::Split => "split",
            ReportScheme::Legacy => "legacy",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportedReport {
    pub scheme: ReportScheme,
    pub generated_at: Option<DateTime<Utc>>,
    pub result: AnalysisResult,
}

fn tag_stats_sheet(tag: OutcomeTag) -> String {
    format!("Stats {}", tag.label())
}

pub fn detect_scheme(wb: &Workbook) -> Option<ReportScheme> {
    if OutcomeTag::PROBLEMS
        .iter()
        .any(|t| wb.has_sheet(&tag_stats_sheet(*t)))
    {
        return Some(ReportScheme::Tagged);
    }
    if wb.has_sheet(SPLIT_STATS) {
        return Some(ReportScheme::Split);
    }
    if wb.has_sheet(LEGACY_STATS) {
        return Some(ReportScheme::Legacy);
    }
    // a current report from a batch without any problem call
    if wb.has_sheet(SUMMARY_SHEET) || wb.has_sheet(&tag_stats_sheet(OutcomeTag::AppointmentCreated)) {
        return Some(ReportScheme::Tagged);
    }
    None
}

/// Read a report directory back into an analysis result.
pub fn import_report(dir: &Path) -> Result<ImportedReport, ReportError> {
    let wb = Workbook::read_dir(dir)?;
    let report = import_workbook(&wb)?;
    info!(
        "Imported {} report from {} ({} sheets)",
        report.scheme.as_str(),
        dir.display(),
        wb.sheets.len()
    );
    Ok(report)
}

pub fn import_workbook(wb: &Workbook) -> Result<ImportedReport, ReportError> {
    let scheme = detect_scheme(wb).ok_or_else(|| ReportError::UnknownSchema {
        sheets: wb.sheet_names(),
    })?;
    debug!("Report scheme: {}", scheme.as_str());

    let appointment_sheet = tag_stats_sheet(OutcomeTag::AppointmentCreated);
    let first_stats = match scheme {
        ReportScheme::Tagged => OutcomeTag::PROBLEMS
            .iter()
            .map(|t| tag_stats_sheet(*t))
            .chain(std::iter::once(appointment_sheet.clone()))
            .find_map(|name| wb.sheet(&name)),
        ReportScheme::Split => wb.sheet(SPLIT_STATS),
        ReportScheme::Legacy => wb.sheet(LEGACY_STATS),
    };
    if let Some(sheet) = first_stats {
        validate_stats_sheet(sheet)?;
    }

    let mut problems: BTreeMap<OutcomeTag, Vec<CategoryStats>> =
        OutcomeTag::PROBLEMS.iter().map(|t| (*t, Vec::new())).collect();

    match scheme {
        ReportScheme::Tagged => {
            for tag in OutcomeTag::PROBLEMS {
                if let Some(sheet) = wb.sheet(&tag_stats_sheet(tag)) {
                    let stats = read_category_sheets(wb, sheet, |c| format!("{}_{c}", tag.prefix()))?;
                    problems.insert(tag, stats);
                }
            }
        }
        ReportScheme::Split => {
            if let Some(sheet) = wb.sheet(SPLIT_STATS) {
                let stats = read_category_sheets(wb, sheet, |c| format!("{SPLIT_PREFIX}_{c}"))?;
                problems.insert(OutcomeTag::ExamNotFound, stats);
            }
        }
        ReportScheme::Legacy => {
            if let Some(sheet) = wb.sheet(LEGACY_STATS) {
                let stats = read_category_sheets(wb, sheet, |c| c.to_string())?;
                problems.insert(OutcomeTag::ExamNotFound, stats);
            }
        }
    }

    let appointments = match wb.sheet(&appointment_sheet) {
        Some(sheet) => read_category_sheets(wb, sheet, |c| {
            format!("{}_{c}", OutcomeTag::AppointmentCreated.prefix())
        })?,
        None => Vec::new(),
    };

    let summary = match wb.sheet(SUMMARY_SHEET) {
        Some(sheet) => read_summary(sheet, &appointments)?,
        None => {
            debug!("No {SUMMARY_SHEET} sheet, rebuilding counters from statistics");
            summarize(&problems, &appointments)
        }
    };

    Ok(ImportedReport {
        scheme,
        generated_at: wb.generated_at,
        result: AnalysisResult {
            summary,
            problems,
            appointments,
        },
    })
}

fn validate_stats_sheet(sheet: &Sheet) -> Result<(), ReportError> {
    let mut sheet = sheet.clone();
    sheet.rebase_on(CATEGORY);
    if sheet.rows.is_empty() {
        return Err(ReportError::EmptySheet(sheet.name));
    }
    for column in [CATEGORY, TOTAL] {
        if sheet.column(&[column]).is_none() {
            return Err(ReportError::MissingColumn {
                column: column.to_string(),
                sheet: sheet.name,
            });
        }
    }
    Ok(())
}

/// Parse a stats sheet and attach each category's detail sheet, named by
/// `detail_name` from the category text as written in the report.
fn read_category_sheets<F>(
    wb: &Workbook,
    sheet: &Sheet,
    detail_name: F,
) -> Result<Vec<CategoryStats>, ReportError>
where
    F: Fn(&str) -> String,
{
    let mut out = Vec::new();
    for (raw, mut stats) in read_stats(sheet)? {
        let name = detail_name(&raw);
        let detail = wb
            .sheet(&name)
            .or_else(|| wb.sheet(&truncate_name(&name, SHEET_NAME_MAX)));
        if let Some(detail) = detail {
            stats.exams = read_exams(detail);
        }
        let listed: u64 = stats.exams.iter().map(|e| e.total).sum();
        stats.unlisted = stats.total.saturating_sub(listed);
        out.push(stats);
    }
    Ok(out)
}

fn read_stats(sheet: &Sheet) -> Result<Vec<(String, CategoryStats)>, ReportError> {
    let mut sheet = sheet.clone();
    sheet.rebase_on(CATEGORY);
    let missing = |column: &str| ReportError::MissingColumn {
        column: column.to_string(),
        sheet: sheet.name.clone(),
    };
    let cat_col = sheet.column(&[CATEGORY]).ok_or_else(|| missing(CATEGORY))?;
    let total_col = sheet.column(&[TOTAL, "Occurrences"]).ok_or_else(|| missing(TOTAL))?;
    let nf_col = sheet.column(&["Non trouvés", "exam_not_found"]);
    let na_col = sheet.column(&["Non autorisés", "exam_not_authorized"]);
    let dur_col = sheet.column(&["Durée totale (s)", "Durée (secondes)"]);
    let avg_col = sheet.column(&["Durée moyenne (s)"]);

    let number = |row: &[Cell], col: Option<usize>| {
        col.and_then(|c| parse_count(&sheet.cell(row, c))).unwrap_or(0)
    };

    let mut out = Vec::new();
    for row in &sheet.rows {
        let raw = sheet.cell(row, cat_col).trim().to_string();
        let lower = raw.to_lowercase();
        // chart helper rows of decorated reports
        if raw.is_empty() || lower == "type" || lower.contains("exam_") {
            continue;
        }
        let Some(total) = parse_count(&sheet.cell(row, total_col)) else {
            debug!("Sheet '{}': skipping row '{raw}' without a numeric total", sheet.name);
            continue;
        };
        let Some(category) = Category::from_label(&raw) else {
            warn!("Sheet '{}': unknown category '{raw}', row skipped", sheet.name);
            continue;
        };

        let mut stats = CategoryStats::empty(category);
        stats.total = total;
        stats.not_found = number(row, nf_col);
        stats.not_authorized = number(row, na_col);
        stats.duration_total = number(row, dur_col);
        stats.duration_average = match avg_col {
            Some(_) => number(row, avg_col),
            None if total > 0 => stats.duration_total / total,
            None => 0,
        };
        out.push((raw, stats));
    }
    Ok(out)
}

fn read_exams(sheet: &Sheet) -> Vec<ExamGroup> {
    let Some(name_col) = sheet.column(&["Examen", "Examen Identifié"]) else {
        warn!("Sheet '{}' has no exam column, details ignored", sheet.name);
        return Vec::new();
    };
    let total_col = sheet.column(&[TOTAL, "Occurrences"]);
    let nf_col = sheet.column(&["Non trouvés", "exam_not_found"]);
    let na_col = sheet.column(&["Non autorisés", "exam_not_authorized"]);
    let dur_col = sheet.column(&["Durée totale (s)", "Durée (secondes)"]);
    let avg_col = sheet.column(&["Durée moyenne (s)"]);
    let ids_col = sheet.column(&["Ids externes", "Id Externe"]);

    let number = |row: &[Cell], col: Option<usize>| {
        col.and_then(|c| parse_count(&sheet.cell(row, c))).unwrap_or(0)
    };

    sheet
        .rows
        .iter()
        .filter_map(|row| {
            let display_name = sheet.cell(row, name_col).trim().to_string();
            if display_name.is_empty() {
                return None;
            }
            let total = number(row, total_col);
            let duration_total = number(row, dur_col);
            let duration_average = match avg_col {
                Some(_) => number(row, avg_col),
                None if total > 0 => duration_total / total,
                None => 0,
            };
            let external_ids = ids_col
                .map(|c| split_ids(&sheet.cell(row, c)))
                .unwrap_or_default();
            Some(ExamGroup {
                normalized_key: normalize(&display_name),
                display_name,
                total,
                not_found: number(row, nf_col),
                not_authorized: number(row, na_col),
                duration_total,
                duration_average,
                external_ids,
            })
        })
        .collect()
}

fn read_summary(sheet: &Sheet, appointments: &[CategoryStats]) -> Result<Summary, ReportError> {
    let missing = |column: &str| ReportError::MissingColumn {
        column: column.to_string(),
        sheet: sheet.name.clone(),
    };
    let metric_col = sheet.column(&[METRIC]).ok_or_else(|| missing(METRIC))?;
    let value_col = sheet.column(&[VALUE]).ok_or_else(|| missing(VALUE))?;

    let values: HashMap<String, u64> = sheet
        .rows
        .iter()
        .filter_map(|row| {
            let value = parse_count(&sheet.cell(row, value_col))?;
            Some((sheet.cell(row, metric_col).trim().to_string(), value))
        })
        .collect();
    let get = |names: &[&str]| names.iter().find_map(|n| values.get(*n).copied());

    let mut summary = Summary {
        total_calls: get(&summary_metric::TOTAL_CALLS).unwrap_or(0),
        distinct_exams: get(&[summary_metric::DISTINCT_EXAMS]).unwrap_or(0),
        categories_found: get(&[summary_metric::CATEGORIES_FOUND]).unwrap_or(0),
        incoherent_count: get(&summary_metric::INCOHERENT).unwrap_or(0),
        total_duration: get(&[summary_metric::TOTAL_DURATION]).unwrap_or(0),
        appointments_created: get(&[summary_metric::APPOINTMENTS]).unwrap_or(0),
        ..Summary::default()
    };
    if summary.appointments_created == 0 && !appointments.is_empty() {
        summary.appointments_created = appointments
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.total));
    }
    summary.average_duration = get(&[summary_metric::AVERAGE_DURATION]).unwrap_or(
        if summary.appointments_created == 0 {
            0
        } else {
            summary.total_duration / summary.appointments_created
        },
    );
    for tag in OutcomeTag::PROBLEMS {
        summary.tag_counts.insert(tag, get(&[tag.label()]).unwrap_or(0));
    }
    Ok(summary)
}
