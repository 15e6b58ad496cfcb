//! Closed set of category ids used by rules, results and the taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaxonomyError;

/// Transaction category id.
///
/// Serialized as the lowercase id string (`"food"`, `"other"`, ...), which is
/// the form export collaborators consume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Income,
    Food,
    Transport,
    Housing,
    Bills,
    Shopping,
    Entertainment,
    Health,
    Education,
    Travel,
    Transfers,
    Fees,
    /// Universal fallback; never targeted by a rule.
    Other,
}

impl CategoryId {
    /// Every id, in taxonomy order. `Other` is always last.
    pub const ALL: [CategoryId; 13] = [
        CategoryId::Income,
        CategoryId::Food,
        CategoryId::Transport,
        CategoryId::Housing,
        CategoryId::Bills,
        CategoryId::Shopping,
        CategoryId::Entertainment,
        CategoryId::Health,
        CategoryId::Education,
        CategoryId::Travel,
        CategoryId::Transfers,
        CategoryId::Fees,
        CategoryId::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Income => "income",
            CategoryId::Food => "food",
            CategoryId::Transport => "transport",
            CategoryId::Housing => "housing",
            CategoryId::Bills => "bills",
            CategoryId::Shopping => "shopping",
            CategoryId::Entertainment => "entertainment",
            CategoryId::Health => "health",
            CategoryId::Education => "education",
            CategoryId::Travel => "travel",
            CategoryId::Transfers => "transfers",
            CategoryId::Fees => "fees",
            CategoryId::Other => "other",
        }
    }

    /// Returns true for the reserved fallback id.
    pub fn is_fallback(&self) -> bool {
        matches!(self, CategoryId::Other)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| TaxonomyError::UnknownCategory(s.to_string()))
    }
}
