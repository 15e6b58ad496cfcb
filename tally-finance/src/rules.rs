//! Keyword rules and the direction-partitioned rule tables.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tally_core::{CategoryId, GENERAL_SUBCATEGORY, RuleSide, Taxonomy};
use tracing::debug;

use crate::error::RuleError;

/// A keyword-to-category binding as written in a rule file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRule {
    pub keywords: Vec<String>,
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategoryRule {
    pub fn new(category: CategoryId, keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            category,
            subcategory: None,
            icon: None,
            color: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

/// Which of the two tables a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTable {
    Income,
    Expense,
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTable::Income => f.write_str("income"),
            RuleTable::Expense => f.write_str("expense"),
        }
    }
}

/// A validated keyword with its whole-word pattern.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    char_len: usize,
    whole_word: Regex,
}

impl Keyword {
    pub fn new(text: &str) -> Result<Self, RuleError> {
        if text.is_empty() || text.trim() != text || text.to_lowercase() != text {
            return Err(RuleError::InvalidKeyword(text.to_string()));
        }
        let whole_word = Regex::new(&format!(r"\b{}\b", regex::escape(text))).map_err(|source| {
            RuleError::Pattern {
                keyword: text.to_string(),
                source,
            }
        })?;
        Ok(Self {
            text: text.to_string(),
            char_len: text.chars().count(),
            whole_word,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// True when the keyword occurs in `description` as a whole word.
    pub fn matches_whole_word(&self, description: &str) -> bool {
        self.whole_word.is_match(description)
    }
}

/// A rule whose keywords have been validated and compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: CategoryRule,
    keywords: Vec<Keyword>,
}

impl CompiledRule {
    fn compile(rule: CategoryRule) -> Result<Self, RuleError> {
        let keywords = rule
            .keywords
            .iter()
            .map(|k| Keyword::new(k))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rule, keywords })
    }

    pub fn rule(&self) -> &CategoryRule {
        &self.rule
    }

    pub fn category(&self) -> CategoryId {
        self.rule.category
    }

    /// The rule's subcategory, or "General" when it has none.
    pub fn subcategory(&self) -> &str {
        self.rule.subcategory.as_deref().unwrap_or(GENERAL_SUBCATEGORY)
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }
}

/// Income and expense rule tables plus the keyword corpus spanning both.
///
/// Immutable once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct RuleTables {
    income: Vec<CompiledRule>,
    expense: Vec<CompiledRule>,
    corpus: Vec<String>,
}

impl RuleTables {
    /// Validate and compile both tables against `taxonomy`.
    pub fn new(
        taxonomy: &Taxonomy,
        income: Vec<CategoryRule>,
        expense: Vec<CategoryRule>,
    ) -> Result<Self, RuleError> {
        let income = compile_table(taxonomy, RuleTable::Income, income)?;
        let expense = compile_table(taxonomy, RuleTable::Expense, expense)?;

        let mut seen = HashSet::new();
        let corpus: Vec<String> = income
            .iter()
            .chain(expense.iter())
            .flat_map(|r| r.keywords.iter())
            .filter(|k| seen.insert(k.as_str().to_string()))
            .map(|k| k.as_str().to_string())
            .collect();

        debug!(
            income = income.len(),
            expense = expense.len(),
            keywords = corpus.len(),
            "compiled rule tables"
        );

        Ok(Self {
            income,
            expense,
            corpus,
        })
    }

    pub fn income(&self) -> &[CompiledRule] {
        &self.income
    }

    pub fn expense(&self) -> &[CompiledRule] {
        &self.expense
    }

    /// The table that applies to `side`.
    pub fn for_side(&self, side: RuleSide) -> &[CompiledRule] {
        if side.is_income() {
            &self.income
        } else {
            &self.expense
        }
    }

    /// Read-only concatenation (income first) for lookups that have no side.
    pub fn combined(&self) -> impl Iterator<Item = &CompiledRule> {
        self.income.iter().chain(self.expense.iter())
    }

    /// Distinct keywords across both tables, in first-seen order.
    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }
}

fn compile_table(
    taxonomy: &Taxonomy,
    table: RuleTable,
    rules: Vec<CategoryRule>,
) -> Result<Vec<CompiledRule>, RuleError> {
    rules
        .into_iter()
        .enumerate()
        .map(|(index, rule)| {
            if rule.keywords.is_empty() {
                return Err(RuleError::EmptyKeywords { table, index });
            }
            if rule.category.is_fallback() {
                return Err(RuleError::FallbackTargeted { table, index });
            }
            if !taxonomy.contains(rule.category) {
                return Err(RuleError::UnknownCategory {
                    table,
                    index,
                    category: rule.category,
                });
            }
            CompiledRule::compile(rule)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Direction, TransactionCategory};

    fn tables() -> RuleTables {
        RuleTables::new(
            &Taxonomy::builtin(),
            vec![CategoryRule::new(CategoryId::Income, &["nomina", "salario"]).with_subcategory("Salario")],
            vec![
                CategoryRule::new(CategoryId::Food, &["mercadona"]),
                CategoryRule::new(CategoryId::Transfers, &["bizum", "nomina"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_keyword_rejects_bad_text() {
        assert!(matches!(Keyword::new(""), Err(RuleError::InvalidKeyword(_))));
        assert!(matches!(Keyword::new("Uber"), Err(RuleError::InvalidKeyword(_))));
        assert!(matches!(Keyword::new(" uber"), Err(RuleError::InvalidKeyword(_))));
        assert!(Keyword::new("uber eats").is_ok());
    }

    #[test]
    fn test_keyword_whole_word() {
        let kw = Keyword::new("uber").unwrap();
        assert!(kw.matches_whole_word("uber eats madrid"));
        assert!(kw.matches_whole_word("pago uber"));
        assert!(!kw.matches_whole_word("suberbio"));
    }

    #[test]
    fn test_keyword_with_regex_metacharacters() {
        let kw = Keyword::new("booking.com").unwrap();
        assert!(kw.matches_whole_word("booking.com hotel"));
        assert!(!kw.matches_whole_word("bookingxcom hotel"));
    }

    #[test]
    fn test_keyword_char_len_counts_chars() {
        assert_eq!(Keyword::new("cafetería").unwrap().char_len(), 9);
    }

    #[test]
    fn test_for_side_selects_table() {
        let t = tables();
        assert_eq!(t.for_side(RuleSide::Credit).len(), 1);
        assert_eq!(t.for_side(RuleSide::Debit).len(), 2);
        assert_eq!(t.for_side(RuleSide::resolve(None, 10.0))[0].category(), CategoryId::Income);
        assert_eq!(
            t.for_side(RuleSide::resolve(Some(Direction::Debit), 10.0))[0].category(),
            CategoryId::Food
        );
    }

    #[test]
    fn test_combined_is_income_then_expense() {
        let t = tables();
        let cats: Vec<_> = t.combined().map(|r| r.category()).collect();
        assert_eq!(
            cats,
            vec![CategoryId::Income, CategoryId::Food, CategoryId::Transfers]
        );
    }

    #[test]
    fn test_corpus_is_distinct() {
        let t = tables();
        assert_eq!(t.corpus(), &["nomina", "salario", "mercadona", "bizum"]);
    }

    #[test]
    fn test_subcategory_defaults_to_general() {
        let t = tables();
        assert_eq!(t.income()[0].subcategory(), "Salario");
        assert_eq!(t.expense()[0].subcategory(), "General");
    }

    #[test]
    fn test_rejects_empty_keyword_list() {
        let err = RuleTables::new(
            &Taxonomy::builtin(),
            Vec::new(),
            vec![CategoryRule::new(CategoryId::Food, &[])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleError::EmptyKeywords {
                table: RuleTable::Expense,
                index: 0
            }
        ));
    }

    #[test]
    fn test_rejects_fallback_target() {
        let err = RuleTables::new(
            &Taxonomy::builtin(),
            vec![CategoryRule::new(CategoryId::Other, &["misc"])],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::FallbackTargeted { .. }));
    }

    #[test]
    fn test_rejects_category_missing_from_taxonomy() {
        let other: TransactionCategory = Taxonomy::builtin().fallback().clone();
        let taxonomy = Taxonomy::new(vec![other]).unwrap();
        let err = RuleTables::new(
            &taxonomy,
            Vec::new(),
            vec![
                CategoryRule::new(CategoryId::Food, &["lidl"]),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleError::UnknownCategory {
                category: CategoryId::Food,
                ..
            }
        ));
    }
}
