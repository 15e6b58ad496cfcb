//! Contextual bonus (amount ranges, strengthener words) and ambiguity
//! penalty (short keywords, competing keywords, negations).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tally_core::{CategoryId, Taxonomy};

use crate::error::RuleError;

pub const STRENGTHENER_BONUS: f64 = 0.03;
pub const MAX_CONTEXT_BONUS: f64 = 0.15;

/// Keywords this short or shorter are treated as unreliable.
pub const SHORT_KEYWORD_LEN: usize = 3;
pub const SHORT_KEYWORD_PENALTY: f64 = 0.05;
pub const COMPETING_KEYWORD_PENALTY: f64 = 0.02;
pub const NEGATION_PENALTY: f64 = 0.1;
pub const MAX_AMBIGUITY_PENALTY: f64 = 0.2;

/// Category-specific amount-magnitude heuristic. Exactly one bound is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountHint {
    pub category: CategoryId,
    /// Applies when `|amount| < below`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
    /// Applies when `|amount| > above`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,
    pub bonus: f64,
}

impl AmountHint {
    fn is_valid(&self) -> bool {
        let one_bound = match (self.below, self.above) {
            (Some(b), None) | (None, Some(b)) => b.is_finite(),
            _ => false,
        };
        one_bound && self.bonus.is_finite() && self.bonus >= 0.0
    }

    fn applies(&self, category: CategoryId, magnitude: f64) -> bool {
        if self.category != category {
            return false;
        }
        match (self.below, self.above) {
            (Some(below), _) => magnitude < below,
            (_, Some(above)) => magnitude > above,
            _ => false,
        }
    }
}

/// `[context]` section of a rule file, as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContextRules {
    pub negations: Vec<String>,
    pub amount_hints: Vec<AmountHint>,
    /// Category id -> strengthener words.
    pub strengtheners: BTreeMap<String, Vec<String>>,
}

/// Validated context data consulted while scoring.
#[derive(Debug, Clone, Default)]
pub struct ContextTable {
    negations: HashSet<String>,
    amount_hints: Vec<AmountHint>,
    strengtheners: HashMap<CategoryId, Vec<String>>,
}

impl ContextTable {
    pub fn new(rules: ContextRules, taxonomy: &Taxonomy) -> Result<Self, RuleError> {
        for word in rules.negations.iter().chain(rules.strengtheners.values().flatten()) {
            check_word(word)?;
        }
        // Negations are compared against single description tokens.
        if let Some(word) = rules
            .negations
            .iter()
            .find(|w| !w.chars().all(char::is_alphanumeric))
        {
            return Err(RuleError::InvalidContextWord(word.clone()));
        }

        for hint in &rules.amount_hints {
            if !hint.is_valid() {
                return Err(RuleError::InvalidAmountHint(hint.category));
            }
            if !taxonomy.contains(hint.category) {
                return Err(tally_core::TaxonomyError::UnknownCategory(hint.category.to_string()).into());
            }
        }

        let mut strengtheners = HashMap::new();
        for (id, words) in rules.strengtheners {
            let category: CategoryId = id.parse()?;
            if !taxonomy.contains(category) {
                return Err(tally_core::TaxonomyError::UnknownCategory(id).into());
            }
            strengtheners.insert(category, words);
        }

        Ok(Self {
            negations: rules.negations.into_iter().collect(),
            amount_hints: rules.amount_hints,
            strengtheners,
        })
    }

    /// Bonus in `[0, MAX_CONTEXT_BONUS]` for `category` given the description
    /// and amount.
    pub fn bonus(&self, description: &str, category: CategoryId, amount: f64) -> f64 {
        let magnitude = amount.abs();
        let mut bonus: f64 = self
            .amount_hints
            .iter()
            .filter(|h| h.applies(category, magnitude))
            .map(|h| h.bonus)
            .sum();

        if let Some(words) = self.strengtheners.get(&category) {
            let found = words.iter().filter(|w| description.contains(w.as_str())).count();
            bonus += STRENGTHENER_BONUS * found as f64;
        }

        bonus.min(MAX_CONTEXT_BONUS)
    }

    /// Penalty in `[0, MAX_AMBIGUITY_PENALTY]` for a hit on `keyword`.
    ///
    /// `corpus` holds every distinct keyword across both rule tables.
    pub fn penalty(&self, description: &str, keyword: &str, corpus: &[String]) -> f64 {
        let mut penalty = 0.0;

        if keyword.chars().count() <= SHORT_KEYWORD_LEN {
            penalty += SHORT_KEYWORD_PENALTY;
        }

        let competing = corpus
            .iter()
            .filter(|k| k.as_str() != keyword && description.contains(k.as_str()))
            .count();
        penalty += COMPETING_KEYWORD_PENALTY * competing as f64;

        if self.is_negated(description) {
            penalty += NEGATION_PENALTY;
        }

        penalty.min(MAX_AMBIGUITY_PENALTY)
    }

    /// Negations count only as whole tokens ("no" does not fire on "nomina").
    fn is_negated(&self, description: &str) -> bool {
        description
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| self.negations.contains(token))
    }
}

fn check_word(word: &str) -> Result<(), RuleError> {
    if word.is_empty() || word.trim() != word || word.to_lowercase() != word {
        return Err(RuleError::InvalidContextWord(word.to_string()));
    }
    Ok(())
}
