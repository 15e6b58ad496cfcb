use tally_core::{CategoryId, TaxonomyError};
use thiserror::Error;

use crate::rules::RuleTable;

/// Load-time failures while building rule tables or context tables.
///
/// Classification never returns these; a built [`crate::Classifier`] has
/// already passed every check.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error("invalid rule file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported rule file version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("{table} rule #{index} has no keywords")]
    EmptyKeywords { table: RuleTable, index: usize },

    #[error("keyword `{0}` must be non-empty, trimmed and lowercase")]
    InvalidKeyword(String),

    #[error("{table} rule #{index} targets `{category}`, which is not in the taxonomy")]
    UnknownCategory {
        table: RuleTable,
        index: usize,
        category: CategoryId,
    },

    #[error("{table} rule #{index} targets the `other` fallback category")]
    FallbackTargeted { table: RuleTable, index: usize },

    #[error("word-boundary pattern for `{keyword}` failed to compile")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    #[error("amount hint for `{0}` needs exactly one of `below`/`above` and a finite, non-negative bonus")]
    InvalidAmountHint(CategoryId),

    #[error("context word `{0}` must be non-empty, trimmed and lowercase (negations: a single alphanumeric token)")]
    InvalidContextWord(String),
}
