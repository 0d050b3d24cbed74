use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const STRIPPED_PUNCTUATION: [char; 3] = [',', '.', ';'];

/// Grouping key for an exam label: lower-case, accents and `, . ;` removed, trimmed.
///
/// An empty key means "no group"; callers skip it.
pub fn normalize(label: &str) -> String {
    let lowered = label.to_lowercase();
    let key: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    key.trim().to_string()
}

/// Display cleanup: same punctuation removal as [`normalize`], case and accents kept.
pub fn clean_display(label: &str) -> String {
    label.replace(STRIPPED_PUNCTUATION, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_accents_and_punctuation() {
        assert_eq!(normalize("Échographie Abdominale."), "echographie abdominale");
        assert_eq!(normalize("  IRM, du genou; gauche "), "irm du genou gauche");
        assert_eq!(normalize("Scanner Thoracique"), normalize("scanner thoracique."));
    }

    #[test]
    fn empty_and_punctuation_only_labels_have_no_key() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(" .;, "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Échographie pelvienne",
            "ÉCHO-DOPPLER des TSA.",
            " . leading punctuation",
            "İstanbul crâne",
            "mammo; écho",
            "ﬁbroscan",
            "Œsophage",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn clean_display_keeps_case_and_accents() {
        assert_eq!(clean_display(" Échographie, pelvienne. "), "Échographie pelvienne");
    }
}
