use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::extract::{StatusFilter, DEFAULT_ACCEPTED_STATUSES};
use crate::classify::{Classifier, ValidatorPolicy};

/// Header names of the call export. Matching ignores case and surrounding
/// whitespace.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnNames {
    pub id: String,
    pub external_id: String,
    pub status: String,
    pub tag: String,
    pub exam: String,
    pub duration: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "Id".to_string(),
            external_id: "Id Externe".to_string(),
            status: "Statut".to_string(),
            tag: "Tag".to_string(),
            exam: "Examen Identifié".to_string(),
            duration: "Durée".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Statuses under which a problem-tag call is counted.
    pub accepted_statuses: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            accepted_statuses: DEFAULT_ACCEPTED_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ValidatorConfig {
    pub policy: ValidatorPolicy,
    /// Added to the built-in medical vocabulary (terms policy only).
    pub extra_terms: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub sheet_name_max: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { sheet_name_max: 31 }
    }
}

/// Top-level allostat config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AllostatConfig {
    pub columns: ColumnNames,
    pub filter: FilterConfig,
    pub validator: ValidatorConfig,
    pub report: ReportConfig,
}

impl AllostatConfig {
    /// Load config from `path`, or ~/.allostat/config.toml. Returns default if
    /// the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        if !path.exists() {
            return Ok(AllostatConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn status_filter(&self) -> StatusFilter {
        StatusFilter::new(self.filter.accepted_statuses.iter().cloned())
    }

    /// Classifier for this config; `policy` overrides the configured one.
    pub fn classifier(&self, policy: Option<ValidatorPolicy>) -> Classifier {
        Classifier::with_policy(
            policy.unwrap_or(self.validator.policy),
            &self.validator.extra_terms,
        )
    }

    /// Effective config rendered as TOML.
    pub fn display(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("(unprintable config: {e})"))
    }
}

/// Path to the config file: ~/.allostat/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".allostat").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.allostat/config.toml
# Every key is optional; missing keys keep the built-in value.

[columns]
# id = "Id"
# external_id = "Id Externe"
# status = "Statut"
# tag = "Tag"
# exam = "Examen Identifié"
# duration = "Durée"

[filter]
# Problem-tag calls are only counted under these statuses.
# accepted_statuses = ["Transféré", "Décroché", "Transferred", "Answered"]

[validator]
# terms | patterns | modality-anatomy
# policy = "terms"
# extra_terms = ["doppler", "scintigraphie"]

[report]
# sheet_name_max = 31
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config(path: Option<&Path>) -> Result<(PathBuf, bool)> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if path.exists() {
        return Ok((path, false));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, default_config_template())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok((path, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let config = AllostatConfig::parse(default_config_template()).unwrap();
        assert_eq!(config, AllostatConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = AllostatConfig::parse(
            r#"
[columns]
exam = "Examens"

[validator]
policy = "modality-anatomy"
"#,
        )
        .unwrap();
        assert_eq!(config.columns.exam, "Examens");
        assert_eq!(config.columns.id, "Id");
        assert_eq!(config.validator.policy, ValidatorPolicy::ModalityAnatomy);
        assert_eq!(config.report.sheet_name_max, 31);
        assert_eq!(config.filter.accepted_statuses.len(), 4);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AllostatConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, AllostatConfig::default());
    }

    #[test]
    fn init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let (_, created) = init_config(Some(&path)).unwrap();
        assert!(created);
        std::fs::write(&path, "[report]\nsheet_name_max = 20\n").unwrap();
        let (_, created) = init_config(Some(&path)).unwrap();
        assert!(!created);
        let config = AllostatConfig::load(Some(&path)).unwrap();
        assert_eq!(config.report.sheet_name_max, 20);
    }

    #[test]
    fn configured_statuses_drive_the_filter() {
        let config = AllostatConfig::parse("[filter]\naccepted_statuses = [\"Abandoned\"]\n").unwrap();
        let filter = config.status_filter();
        assert!(filter.accepts("Abandoned"));
        assert!(!filter.accepts("Transféré"));
    }
}
