//! TOML rule files: the embedded defaults and hot-swappable files on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tally_core::Taxonomy;
use tracing::info;

use crate::classifier::Classifier;
use crate::context::{ContextRules, ContextTable};
use crate::error::RuleError;
use crate::rules::{CategoryRule, RuleTables};

pub const RULE_FILE_VERSION: u32 = 1;

/// The built-in tables, shipped inside the binary.
pub const DEFAULT_RULES_TOML: &str = include_str!("../data/default_rules.toml");

/// Parsed, not yet validated, rule file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleFile {
    pub version: u32,
    /// Credit-side rules, in tie-break order.
    #[serde(default)]
    pub income: Vec<CategoryRule>,
    /// Debit-side rules, in tie-break order.
    #[serde(default)]
    pub expense: Vec<CategoryRule>,
    #[serde(default)]
    pub context: ContextRules,
}

impl RuleFile {
    pub fn builtin() -> Result<Self, RuleError> {
        Self::from_toml_str(DEFAULT_RULES_TOML)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(s)?;
        if file.version != RULE_FILE_VERSION {
            return Err(RuleError::UnsupportedVersion {
                found: file.version,
                expected: RULE_FILE_VERSION,
            });
        }
        Ok(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let file = Self::from_toml_str(&s).with_context(|| format!("parse {}", path.display()))?;
        info!(
            path = %path.display(),
            income = file.income.len(),
            expense = file.expense.len(),
            "loaded rule file"
        );
        Ok(file)
    }

    /// Validate against `taxonomy` and build a ready classifier.
    pub fn into_classifier(self, taxonomy: &Taxonomy) -> Result<Classifier, RuleError> {
        let rules = RuleTables::new(taxonomy, self.income, self.expense)?;
        let context = ContextTable::new(self.context, taxonomy)?;
        Ok(Classifier::new(rules, context))
    }
}

/// Load `path` if given, otherwise the embedded defaults, and build a
/// classifier over the built-in taxonomy.
pub fn load_classifier(path: Option<&Path>) -> Result<Classifier> {
    let file = match path {
        Some(p) => RuleFile::load(p)?,
        None => RuleFile::builtin().context("parse embedded default rules")?,
    };
    let classifier = file
        .into_classifier(&Taxonomy::builtin())
        .context("validate rule tables")?;
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::CategoryId;

    #[test]
    fn test_builtin_parses_and_validates() {
        let file = RuleFile::builtin().unwrap();
        assert!(!file.income.is_empty());
        assert!(!file.expense.is_empty());
        assert!(file.into_classifier(&Taxonomy::builtin()).is_ok());
    }

    #[test]
    fn test_builtin_income_table_starts_with_salary() {
        let file = RuleFile::builtin().unwrap();
        assert_eq!(file.income[0].category, CategoryId::Income);
        assert_eq!(file.income[0].subcategory.as_deref(), Some("Salario"));
    }

    #[test]
    fn test_minimal_file_defaults_sections() {
        let file = RuleFile::from_toml_str("version = 1").unwrap();
        assert!(file.income.is_empty());
        assert!(file.expense.is_empty());
        assert_eq!(file.context, ContextRules::default());
    }

    #[test]
    fn test_rejects_other_version() {
        let err = RuleFile::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(
            err,
            RuleError::UnsupportedVersion { found: 2, expected: 1 }
        ));
    }

    #[test]
    fn test_unknown_category_fails_at_load() {
        let src = r#"
version = 1
[[expense]]
keywords = ["lidl"]
category = "groceries"
"#;
        assert!(matches!(RuleFile::from_toml_str(src), Err(RuleError::Toml(_))));
    }

    #[test]
    fn test_serializes_back_to_equal_file() {
        let file = RuleFile::builtin().unwrap();
        let text = toml::to_string(&file).unwrap();
        assert_eq!(RuleFile::from_toml_str(&text).unwrap(), file);
    }
}
