use std::path::Path;
use tracing::info;

use super::workbook::{truncate_name, Cell, Manifest, Sheet, Workbook};
use super::{
    join_ids, summary_metric, DETAIL_HEADERS, METRIC, STATS_HEADERS, SUMMARY_SHEET, TAG_SEPARATOR,
    VALUE,
};
use crate::analysis::model::{AnalysisResult, CategoryStats, OutcomeTag};
use crate::error::ReportError;

/// Lay the analysis out as sheets: `Summary`, then per problem tag a stats
/// sheet and one detail sheet per category with listed exams, then the
/// appointment sheets.
pub fn build_workbook(result: &AnalysisResult, max_name: usize) -> Workbook {
    let mut wb = Workbook::new();
    wb.push(summary_sheet(result));

    for tag in OutcomeTag::PROBLEMS {
        push_tag_sheets(&mut wb, tag, result.problem_stats(tag), max_name);
    }
    push_tag_sheets(&mut wb, OutcomeTag::AppointmentCreated, &result.appointments, max_name);

    wb
}

/// Build the workbook and write it to `dir`.
pub fn export_report(
    result: &AnalysisResult,
    dir: &Path,
    max_name: usize,
) -> Result<Manifest, ReportError> {
    let wb = build_workbook(result, max_name);
    let manifest = wb.write_dir(dir)?;
    info!("Wrote {} sheets to {}", manifest.sheets.len(), dir.display());
    Ok(manifest)
}

fn summary_sheet(result: &AnalysisResult) -> Sheet {
    let s = &result.summary;
    let mut sheet = Sheet::new(SUMMARY_SHEET, &[METRIC, VALUE]);
    let rows: [(&str, u64); 7] = [
        (summary_metric::TOTAL_CALLS[0], s.total_calls),
        (summary_metric::DISTINCT_EXAMS, s.distinct_exams),
        (summary_metric::CATEGORIES_FOUND, s.categories_found),
        (summary_metric::INCOHERENT[0], s.incoherent_count),
        (summary_metric::TOTAL_DURATION, s.total_duration),
        (summary_metric::AVERAGE_DURATION, s.average_duration),
        (summary_metric::APPOINTMENTS, s.appointments_created),
    ];
    for (metric, value) in rows {
        sheet.push(vec![metric.into(), value.into()]);
    }
    sheet.push(vec![TAG_SEPARATOR.into(), "".into()]);
    for tag in OutcomeTag::PROBLEMS {
        sheet.push(vec![tag.label().into(), s.tag_count(tag).into()]);
    }
    sheet
}

fn push_tag_sheets(wb: &mut Workbook, tag: OutcomeTag, stats: &[CategoryStats], max_name: usize) {
    if stats.is_empty() {
        return;
    }

    let mut overview = Sheet::new(
        truncate_name(&format!("Stats {}", tag.label()), max_name),
        &STATS_HEADERS,
    );
    for s in stats {
        overview.push(vec![
            s.category.as_str().into(),
            s.total.into(),
            s.not_found.into(),
            s.not_authorized.into(),
            s.duration_total.into(),
            s.duration_average.into(),
        ]);
    }
    wb.push(overview);

    for s in stats.iter().filter(|s| !s.exams.is_empty()) {
        let name = truncate_name(&format!("{}_{}", tag.prefix(), s.category.as_str()), max_name);
        let mut detail = Sheet::new(name, &DETAIL_HEADERS);
        for (i, exam) in s.exams.iter().enumerate() {
            detail.push(vec![
                Cell::Int(i as u64 + 1),
                exam.display_name.as_str().into(),
                exam.total.into(),
                exam.not_found.into(),
                exam.not_authorized.into(),
                exam.duration_total.into(),
                exam.duration_average.into(),
                join_ids(&exam.external_ids).into(),
            ]);
        }
        wb.push(detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{ExamGroup, Summary};
    use crate::classify::Category;
    use std::collections::BTreeMap;

    fn result() -> AnalysisResult {
        let mut irm = CategoryStats::empty(Category::Irm);
        irm.total = 3;
        irm.not_found = 3;
        irm.unlisted = 1;
        irm.exams = vec![ExamGroup {
            normalized_key: "irm du genou".to_string(),
            display_name: "IRM du genou".to_string(),
            total: 2,
            not_found: 2,
            not_authorized: 0,
            duration_total: 0,
            duration_average: 0,
            external_ids: vec!["11".to_string(), "12".to_string()],
        }];
        let mut incoherent = CategoryStats::empty(Category::Incoherent);
        incoherent.total = 1;
        incoherent.unlisted = 1;

        let mut problems = BTreeMap::new();
        for tag in OutcomeTag::PROBLEMS {
            problems.insert(tag, Vec::new());
        }
        problems.insert(OutcomeTag::ExamNotFound, vec![irm, incoherent]);

        let mut summary = Summary {
            total_calls: 4,
            distinct_exams: 1,
            categories_found: 2,
            incoherent_count: 1,
            ..Summary::default()
        };
        summary.tag_counts.insert(OutcomeTag::ExamNotFound, 4);

        AnalysisResult {
            summary,
            problems,
            appointments: Vec::new(),
        }
    }

    #[test]
    fn sheets_only_for_tags_and_categories_with_content() {
        let wb = build_workbook(&result(), 31);
        assert_eq!(
            wb.sheet_names(),
            vec!["Summary", "Stats Non trouvés", "NF_IRM"]
        );
    }

    #[test]
    fn detail_rows_are_numbered_and_ids_joined() {
        let wb = build_workbook(&result(), 31);
        let detail = wb.sheet("NF_IRM").unwrap();
        assert_eq!(detail.headers, DETAIL_HEADERS.to_vec());
        let row = &detail.rows[0];
        assert_eq!(row[0], Cell::Int(1));
        assert_eq!(row[1], Cell::from("IRM du genou"));
        assert_eq!(row[7], Cell::from("11|12"));
    }

    #[test]
    fn summary_lists_every_problem_tag() {
        let wb = build_workbook(&result(), 31);
        let summary = wb.sheet("Summary").unwrap();
        assert_eq!(summary.rows.len(), 7 + 1 + 6);
        assert_eq!(summary.rows[0][0], Cell::from("Appels transférés/décrochés (total)"));
        assert_eq!(summary.rows[0][1], Cell::Int(4));
        assert_eq!(summary.rows[7][0], Cell::from(TAG_SEPARATOR));
        assert_eq!(summary.rows[8], vec![Cell::from("Non trouvés"), Cell::Int(4)]);
    }

    #[test]
    fn sheet_names_respect_the_limit() {
        let wb = build_workbook(&result(), 8);
        assert!(wb.sheets.iter().all(|s| s.name.chars().count() <= 8));
        assert!(wb.has_sheet("Stats No"));
    }
}
