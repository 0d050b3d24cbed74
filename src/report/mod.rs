pub mod export;
pub mod import;
pub mod workbook;

pub use export::{build_workbook, export_report};
pub use import::{detect_scheme, import_report, import_workbook, ImportedReport, ReportScheme};
pub use workbook::{Cell, Manifest, Sheet, Workbook};

pub const SUMMARY_SHEET: &str = "Summary";
pub const METRIC: &str = "Métrique";
pub const VALUE: &str = "Valeur";
pub const TAG_SEPARATOR: &str = "--- Par tag ---";

pub const CATEGORY: &str = "Catégorie";
pub const TOTAL: &str = "Total";

pub const STATS_HEADERS: [&str; 6] = [
    CATEGORY,
    TOTAL,
    "Non trouvés",
    "Non autorisés",
    "Durée totale (s)",
    "Durée moyenne (s)",
];

pub const DETAIL_HEADERS: [&str; 8] = [
    "#",
    "Examen",
    TOTAL,
    "Non trouvés",
    "Non autorisés",
    "Durée totale (s)",
    "Durée moyenne (s)",
    "Ids externes",
];

/// Summary metric names. Slices list the current name first, then names
/// older reports used.
pub mod summary_metric {
    pub const TOTAL_CALLS: [&str; 3] = [
        "Appels transférés/décrochés (total)",
        "Appels transférés/décrochés",
        "Appels transférés",
    ];
    pub const DISTINCT_EXAMS: &str = "Examens distincts";
    pub const CATEGORIES_FOUND: &str = "Catégories trouvées";
    pub const INCOHERENT: [&str; 2] = ["Intitulés d'examens incohérents", "Intitulés incompris"];
    pub const TOTAL_DURATION: &str = "Durée totale conversations (secondes)";
    pub const AVERAGE_DURATION: &str = "Durée moyenne conversations (secondes)";
    pub const APPOINTMENTS: &str = "Rendez-vous créés";
}

const ID_SEPARATOR: char = '|';
const ID_ESCAPE: char = '\\';

/// Join external ids into one cell. `|` and `\` inside an id are escaped with
/// `\` so [`split_ids`] gives the ids back unchanged.
pub fn join_ids(ids: &[String]) -> String {
    let mut out = String::new();
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(ID_SEPARATOR);
        }
        for ch in id.chars() {
            if ch == ID_SEPARATOR || ch == ID_ESCAPE {
                out.push(ID_ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}

/// Inverse of [`join_ids`]. A `\` not followed by `|` or `\` is kept as is,
/// so cells written by hand read the way they look. Blank ids are dropped.
pub fn split_ids(cell: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ID_ESCAPE => match chars.peek() {
                Some(&next) if next == ID_SEPARATOR || next == ID_ESCAPE => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push(ch),
            },
            ID_SEPARATOR => ids.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    ids.push(current);
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_ids_join_with_a_bar() {
        assert_eq!(join_ids(&ids(&["11", "12"])), "11|12");
        assert_eq!(split_ids("11| 12 |"), ids(&["11", "12"]));
        assert!(split_ids("").is_empty());
    }

    #[test]
    fn ids_containing_the_separator_survive() {
        let original = ids(&["A|B", r"C\D", "E"]);
        let cell = join_ids(&original);
        assert_eq!(cell, r"A\|B|C\\D|E");
        assert_eq!(split_ids(&cell), original);
    }

    #[test]
    fn lone_backslash_is_literal() {
        assert_eq!(split_ids(r"dossier\12|7"), ids(&[r"dossier\12", "7"]));
    }
}
