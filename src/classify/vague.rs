use super::terms;

/// Display-only filter for labels that carry less than two significant words
/// once booking boilerplate and stop-words are gone ("rdv pour une écho").
#[derive(Debug, Clone)]
pub struct VagueFilter {
    phrases: Vec<String>,
    stop_words: Vec<String>,
}

impl VagueFilter {
    /// `phrases` are removed in the given order, so list longer ones first.
    pub fn new(phrases: Vec<String>, stop_words: Vec<String>) -> Self {
        Self {
            phrases,
            stop_words,
        }
    }

    pub fn is_too_vague(&self, label: &str) -> bool {
        let mut text = label.trim().to_lowercase();
        if text.is_empty() {
            return true;
        }

        text = text.replace([',', '.', ';'], " ");
        for phrase in &self.phrases {
            text = text.replace(phrase.as_str(), " ");
        }

        let significant = text
            .split_whitespace()
            .filter(|w| w.chars().count() > 1 && !self.stop_words.iter().any(|s| s == w))
            .count();
        significant < 2
    }
}

impl Default for VagueFilter {
    fn default() -> Self {
        Self::new(
            terms::BOILERPLATE_PHRASES.iter().map(|s| s.to_string()).collect(),
            terms::STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boilerplate_and_stop_words_do_not_count() {
        let f = VagueFilter::default();
        assert!(f.is_too_vague("rdv"));
        assert!(f.is_too_vague("Prendre un rendez-vous pour une échographie"));
        assert!(f.is_too_vague("IRM"));
        assert!(f.is_too_vague("un scanner."));
        assert!(f.is_too_vague(""));
    }

    #[test]
    fn two_significant_words_are_enough() {
        let f = VagueFilter::default();
        assert!(!f.is_too_vague("IRM du genou"));
        assert!(!f.is_too_vague("rdv pour scanner thoracique"));
        assert!(!f.is_too_vague("Échographie, pelvienne"));
    }

    #[test]
    fn single_letters_are_ignored() {
        let f = VagueFilter::default();
        assert!(f.is_too_vague("radio d x"));
    }
}
