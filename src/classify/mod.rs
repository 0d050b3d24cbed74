pub mod categorize;
pub mod normalize;
pub mod terms;
pub mod vague;
pub mod validator;

pub use categorize::{Category, CategoryTable};
pub use normalize::{clean_display, normalize};
pub use vague::VagueFilter;
pub use validator::{ExamValidator, ValidatorPolicy};

/// Classification rules for one analysis run: category table, validation
/// policy and the vagueness filter. Built once, shared read-only.
pub struct Classifier {
    table: CategoryTable,
    validator: Box<dyn ExamValidator>,
    vague: VagueFilter,
}

impl Classifier {
    pub fn new(table: CategoryTable, validator: Box<dyn ExamValidator>, vague: VagueFilter) -> Self {
        Self {
            table,
            validator,
            vague,
        }
    }

    /// Built-in vocabularies with the given policy.
    pub fn with_policy(policy: ValidatorPolicy, extra_terms: &[String]) -> Self {
        Self::new(
            CategoryTable::default(),
            policy.build(extra_terms),
            VagueFilter::default(),
        )
    }

    pub fn is_valid(&self, label: &str) -> bool {
        self.validator.is_valid(label)
    }

    pub fn is_too_vague(&self, label: &str) -> bool {
        self.vague.is_too_vague(label)
    }

    pub fn policy_name(&self) -> &'static str {
        self.validator.name()
    }

    /// Map a label to its category.
    ///
    /// With `apply_filter` off (appointment-created calls) the label is never
    /// reported as incoherent.
    pub fn categorize(&self, label: &str, apply_filter: bool) -> Category {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return Category::Unknown;
        }
        if apply_filter && !self.validator.is_valid(label) {
            return Category::Incoherent;
        }
        self.table.lookup(&lower).unwrap_or(Category::Other)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_policy(ValidatorPolicy::default(), &[])
    }
}

/// Everything the classifier says about one label, for diagnostics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LabelReport {
    pub label: String,
    pub normalized: String,
    pub valid: bool,
    pub category: Category,
    pub appointment_category: Category,
    pub too_vague: bool,
}

impl Classifier {
    pub fn explain(&self, label: &str) -> LabelReport {
        LabelReport {
            label: label.to_string(),
            normalized: normalize(label),
            valid: self.is_valid(label),
            category: self.categorize(label, true),
            appointment_category: self.categorize(label, false),
            too_vague: self.is_too_vague(&clean_display(label)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knee_mri_is_irm() {
        let c = Classifier::default();
        assert!(c.is_valid("IRM du genou gauche"));
        assert_eq!(c.categorize("IRM du genou gauche", true), Category::Irm);
    }

    #[test]
    fn conversational_label_is_incoherent() {
        let c = Classifier::default();
        let label = "ma mère a besoin d'un rendez-vous";
        assert!(!c.is_valid(label));
        assert_eq!(c.categorize(label, true), Category::Incoherent);
    }

    #[test]
    fn blank_label_is_unknown_even_with_filter() {
        let c = Classifier::default();
        assert_eq!(c.categorize("", true), Category::Unknown);
        assert_eq!(c.categorize("   ", false), Category::Unknown);
    }

    #[test]
    fn filter_off_never_yields_incoherent() {
        let c = Classifier::default();
        for label in ["rdv", "bonjour", "ma mère a besoin d'un rendez-vous", "zzz", "IRM"] {
            assert_ne!(c.categorize(label, false), Category::Incoherent);
        }
        assert_eq!(c.categorize("rdv", false), Category::Other);
    }

    #[test]
    fn bare_rdv_is_rejected_at_validation() {
        let c = Classifier::default();
        assert_eq!(c.categorize("rdv", true), Category::Incoherent);
        assert!(c.is_too_vague("rdv"));
    }

    #[test]
    fn valid_label_without_category_keyword_is_other() {
        let c = Classifier::default();
        assert_eq!(c.categorize("biopsie du sein", true), Category::Other);
    }

    #[test]
    fn fixture_vocabularies_can_be_injected() {
        let c = Classifier::new(
            CategoryTable::new(vec![(Category::Irm, vec!["mri".to_string()])]),
            Box::new(validator::TermMembership::new(["knee"])),
            VagueFilter::new(vec![], vec![]),
        );
        assert_eq!(c.categorize("MRI knee", true), Category::Irm);
        assert_eq!(c.categorize("MRI", true), Category::Incoherent);
        assert_eq!(c.categorize("knee", true), Category::Other);
    }

    #[test]
    fn explain_reports_every_facet() {
        let c = Classifier::default();
        let r = c.explain("Scanner Thoracique.");
        assert_eq!(r.normalized, "scanner thoracique");
        assert!(r.valid);
        assert_eq!(r.category, Category::Scanner);
        assert!(!r.too_vague);
    }
}
