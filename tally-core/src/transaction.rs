//! Per-call classification input and output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::CategoryId;
use crate::error::TaxonomyError;

/// Subcategory reported when a matching rule carries none.
pub const GENERAL_SUBCATEGORY: &str = "General";
/// Subcategory of the debit-side catch-all result.
pub const UNCATEGORIZED_SUBCATEGORY: &str = "Uncategorized";
/// Subcategory of the credit-side fallback result.
pub const OTHER_INCOME_SUBCATEGORY: &str = "Other Income";

/// Whether a transaction increases (credit) or decreases (debit) the balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Direction::Credit),
            "debit" => Ok(Direction::Debit),
            other => Err(TaxonomyError::UnknownDirection(other.to_string())),
        }
    }
}

/// Rule-set selector, resolved once per call from the optional direction
/// and the amount sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSide {
    Credit,
    Debit,
    /// No direction supplied; `positive` is `amount > 0`.
    Unspecified { positive: bool },
}

impl RuleSide {
    /// A NaN amount is not positive and therefore lands on the debit side.
    pub fn resolve(direction: Option<Direction>, amount: f64) -> Self {
        match direction {
            Some(Direction::Credit) => RuleSide::Credit,
            Some(Direction::Debit) => RuleSide::Debit,
            None => RuleSide::Unspecified {
                positive: amount > 0.0,
            },
        }
    }

    /// True when the income rules and the income fallback apply.
    pub fn is_income(&self) -> bool {
        matches!(
            self,
            RuleSide::Credit | RuleSide::Unspecified { positive: true }
        )
    }
}

/// One transaction to classify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationInput {
    /// Raw text; may be empty.
    pub description: String,
    /// Signed amount. Negative means outgoing when no direction is given.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl ClassificationInput {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn side(&self) -> RuleSide {
        RuleSide::resolve(self.direction, self.amount)
    }
}

/// Category assignment handed to export/reporting collaborators verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub category: CategoryId,
    /// Display label; never empty.
    pub subcategory: String,
    /// Within `[0, 0.95]`.
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(category: CategoryId, subcategory: impl Into<String>, confidence: f64) -> Self {
        Self {
            category,
            subcategory: subcategory.into(),
            confidence,
        }
    }

    /// `other` / "Uncategorized" at the fixed low confidence.
    pub fn uncategorized() -> Self {
        Self::new(CategoryId::Other, UNCATEGORIZED_SUBCATEGORY, 0.1)
    }

    /// `income` / "Other Income" at the given confidence.
    pub fn other_income(confidence: f64) -> Self {
        Self::new(CategoryId::Income, OTHER_INCOME_SUBCATEGORY, confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_is_strict() {
        assert_eq!("credit".parse::<Direction>().unwrap(), Direction::Credit);
        assert_eq!("debit".parse::<Direction>().unwrap(), Direction::Debit);
        assert_eq!(
            "CREDIT".parse::<Direction>().unwrap_err(),
            TaxonomyError::UnknownDirection("CREDIT".into())
        );
        assert!("refund".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_deserialize_rejects_unknown() {
        assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
    }

    #[test]
    fn test_side_follows_explicit_direction() {
        assert_eq!(RuleSide::resolve(Some(Direction::Credit), -50.0), RuleSide::Credit);
        assert_eq!(RuleSide::resolve(Some(Direction::Debit), 50.0), RuleSide::Debit);
        assert!(RuleSide::Credit.is_income());
        assert!(!RuleSide::Debit.is_income());
    }

    #[test]
    fn test_side_without_direction_uses_sign() {
        assert!(RuleSide::resolve(None, 0.01).is_income());
        assert!(!RuleSide::resolve(None, 0.0).is_income());
        assert!(!RuleSide::resolve(None, -3.0).is_income());
        assert_eq!(
            RuleSide::resolve(None, f64::NAN),
            RuleSide::Unspecified { positive: false }
        );
    }

    #[test]
    fn test_input_deserializes_without_direction() {
        let input: ClassificationInput =
            serde_json::from_str(r#"{"description":"PARKING","amount":-8.0}"#).unwrap();
        assert_eq!(input.direction, None);
        assert_eq!(input.side(), RuleSide::Unspecified { positive: false });
    }

    #[test]
    fn test_result_serializes_contract_fields() {
        let json = serde_json::to_value(ClassificationResult::uncategorized()).unwrap();
        assert_eq!(json["category"], "other");
        assert_eq!(json["subcategory"], "Uncategorized");
        assert_eq!(json["confidence"], 0.1);
    }
}
