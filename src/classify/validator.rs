use regex::Regex;
use serde::{Deserialize, Serialize};

use super::terms;

/// Decides whether a raw exam label is a coherent medical request.
///
/// Implementations must be total: garbage input returns `false`, never panics.
pub trait ExamValidator: Send + Sync {
    /// Policy name, shown in diagnostics.
    fn name(&self) -> &'static str;

    fn is_valid(&self, label: &str) -> bool;
}

/// Which validation policy to use. `Terms` is the current one; the other two
/// are earlier generations kept for comparison runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidatorPolicy {
    #[default]
    Terms,
    Patterns,
    ModalityAnatomy,
}

impl ValidatorPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "terms" | "term-membership" => Some(ValidatorPolicy::Terms),
            "patterns" | "legacy" => Some(ValidatorPolicy::Patterns),
            "modality-anatomy" | "type-anatomy" => Some(ValidatorPolicy::ModalityAnatomy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorPolicy::Terms => "terms",
            ValidatorPolicy::Patterns => "patterns",
            ValidatorPolicy::ModalityAnatomy => "modality-anatomy",
        }
    }

    /// Build the validator for this policy with the built-in vocabularies
    /// plus `extra_terms`.
    pub fn build(&self, extra_terms: &[String]) -> Box<dyn ExamValidator> {
        match self {
            ValidatorPolicy::Terms => {
                let mut all = terms::medical_terms();
                all.extend(extra_terms.iter().cloned());
                Box::new(TermMembership::new(all))
            }
            ValidatorPolicy::Patterns => Box::new(IncomprehensiblePatterns::default()),
            ValidatorPolicy::ModalityAnatomy => {
                let mut anatomy: Vec<String> =
                    terms::ANATOMY_TERMS.iter().map(|t| t.to_string()).collect();
                anatomy.extend(extra_terms.iter().cloned());
                Box::new(ModalityAnatomy::new(
                    terms::MODALITY_TERMS.iter().map(|t| t.to_string()),
                    anatomy,
                ))
            }
        }
    }
}

fn lowered_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    terms
        .into_iter()
        .map(|t| t.into().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Valid when the label contains at least one known medical term as a substring.
#[derive(Debug, Clone)]
pub struct TermMembership {
    terms: Vec<String>,
}

impl TermMembership {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: lowered_terms(terms),
        }
    }
}

impl Default for TermMembership {
    fn default() -> Self {
        Self::new(terms::medical_terms())
    }
}

impl ExamValidator for TermMembership {
    fn name(&self) -> &'static str {
        "terms"
    }

    fn is_valid(&self, label: &str) -> bool {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }
        self.terms.iter().any(|t| lower.contains(t.as_str()))
    }
}

/// First-generation policy: everything is valid unless it looks like a
/// transcribed sentence ("ma mère", "je veux", an age, a greeting...).
#[derive(Debug, Clone)]
pub struct IncomprehensiblePatterns {
    patterns: Vec<Regex>,
}

impl IncomprehensiblePatterns {
    pub fn new(patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl Default for IncomprehensiblePatterns {
    fn default() -> Self {
        Self::new(terms::INCOMPREHENSIBLE_PATTERNS).expect("built-in patterns are valid regexes")
    }
}

impl ExamValidator for IncomprehensiblePatterns {
    fn name(&self) -> &'static str {
        "patterns"
    }

    fn is_valid(&self, label: &str) -> bool {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }
        !self.patterns.iter().any(|re| re.is_match(&lower))
    }
}

/// Intermediate policy: a modality alone ("un scanner") is not enough, the
/// label must also name a body part.
#[derive(Debug, Clone)]
pub struct ModalityAnatomy {
    modalities: Vec<String>,
    anatomy: Vec<String>,
}

impl ModalityAnatomy {
    pub fn new<I, J, S, T>(modalities: I, anatomy: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            modalities: lowered_terms(modalities),
            anatomy: lowered_terms(anatomy),
        }
    }
}

impl Default for ModalityAnatomy {
    fn default() -> Self {
        Self::new(
            terms::MODALITY_TERMS.iter().copied(),
            terms::ANATOMY_TERMS.iter().copied(),
        )
    }
}

impl ExamValidator for ModalityAnatomy {
    fn name(&self) -> &'static str {
        "modality-anatomy"
    }

    fn is_valid(&self, label: &str) -> bool {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }
        self.modalities.iter().any(|t| lower.contains(t.as_str()))
            && self.anatomy.iter().any(|t| lower.contains(t.as_str()))
    }
}
