use unicode_width::UnicodeWidthStr;

use crate::analysis::model::{AnalysisResult, CategoryStats, OutcomeTag, Summary};
use crate::classify::LabelReport;
use crate::report::ImportedReport;

/// Format duration in seconds to human-readable string.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Left-align to a display width; `format!("{:<n}")` counts chars, not columns.
fn pad(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let fill = width.saturating_sub(UnicodeWidthStr::width(s.as_str()));
    format!("{s}{}", " ".repeat(fill))
}

pub fn print_summary(s: &Summary) {
    println!("Summary:");
    println!("  Problem calls:       {}", s.total_calls);
    println!("  Distinct exams:      {}", s.distinct_exams);
    println!("  Categories found:    {}", s.categories_found);
    println!("  Incoherent labels:   {}", s.incoherent_count);
    println!("  Appointments:        {}", s.appointments_created);
    println!(
        "  Call time:           {} (avg {})",
        format_duration(s.total_duration),
        format_duration(s.average_duration)
    );
    println!("\n  Per tag:");
    for tag in OutcomeTag::PROBLEMS {
        println!("    {} {:>6}", pad(tag.label(), 18), s.tag_count(tag));
    }
}

/// One tag's categories, each followed by its `top` most frequent exams.
pub fn print_category_stats(title: &str, stats: &[CategoryStats], top: usize) {
    if stats.is_empty() {
        println!("\n{title}: no calls");
        return;
    }

    let total: u64 = stats.iter().map(|s| s.total).sum();
    println!(
        "\n{title}: {total} call{}\n",
        if total == 1 { "" } else { "s" }
    );
    println!(
        "  {} {:>6} {:>6} {:>6} {:>8}",
        pad("CATEGORY", 24),
        "TOTAL",
        "NF",
        "NA",
        "AVG"
    );
    println!("  {}", "-".repeat(54));

    for s in stats {
        println!(
            "  {} {:>6} {:>6} {:>6} {:>8}",
            pad(s.category.as_str(), 24),
            s.total,
            s.not_found,
            s.not_authorized,
            format_duration(s.duration_average),
        );
        for exam in s.exams.iter().take(top) {
            println!("    {} {:>6}", pad(&exam.display_name, 48), exam.total);
        }
        if s.exams.len() > top {
            println!("    ... {} more", s.exams.len() - top);
        }
    }
}

pub fn print_analysis(result: &AnalysisResult, top: usize) {
    print_summary(&result.summary);
    for tag in OutcomeTag::PROBLEMS {
        print_category_stats(tag.label(), result.problem_stats(tag), top);
    }
    print_category_stats(
        OutcomeTag::AppointmentCreated.label(),
        &result.appointments,
        top,
    );
}

pub fn print_import(report: &ImportedReport, top: usize) {
    print!("Report scheme: {}", report.scheme.as_str());
    match report.generated_at {
        Some(at) => println!(" (generated {})", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!(),
    }
    println!();
    print_analysis(&report.result, top);
}

/// `allostat classify` output.
pub fn print_label_reports(reports: &[LabelReport], policy: &str) {
    println!("Validator policy: {policy}\n");
    println!(
        "  {} {} {:<6} {} {:<6}",
        pad("LABEL", 36),
        pad("CATEGORY", 22),
        "VALID",
        pad("APPOINTMENT", 14),
        "VAGUE"
    );
    println!("  {}", "-".repeat(88));
    for r in reports {
        println!(
            "  {} {} {:<6} {} {:<6}",
            pad(&r.label, 36),
            pad(r.category.as_str(), 22),
            if r.valid { "yes" } else { "no" },
            pad(r.appointment_category.as_str(), 14),
            if r.too_vague { "yes" } else { "no" },
        );
        println!("    key: {}", r.normalized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_compact() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(125), "2m05s");
        assert_eq!(format_duration(3725), "1h02m");
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("IRM du genou", 20), "IRM du genou");
        assert_eq!(truncate("Échographie abdominale complète", 10), "Échogra...");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("é", 3), "é  ");
        assert_eq!(UnicodeWidthStr::width(pad("Radiographie du thorax", 8).as_str()), 8);
    }
}
