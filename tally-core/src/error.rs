use thiserror::Error;

use crate::category::CategoryId;

/// Failures at the typed boundary (parsing ids and directions) and while
/// assembling a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("unknown category id `{0}`")]
    UnknownCategory(String),

    #[error("unknown transaction direction `{0}` (expected `credit` or `debit`)")]
    UnknownDirection(String),

    #[error("category `{0}` appears more than once in the taxonomy")]
    DuplicateCategory(CategoryId),

    #[error("taxonomy has no `other` entry")]
    MissingFallback,

    #[error("the `other` entry must be the last taxonomy entry")]
    FallbackNotLast,
}
