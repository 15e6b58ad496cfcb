use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{ClassificationInput, Direction};

/// One extracted statement line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Negative means outgoing when `direction` is absent.
    pub amount: f64,
    pub direction: Option<Direction>,
}

impl StatementTransaction {
    pub fn to_input(&self) -> ClassificationInput {
        ClassificationInput {
            description: self.description.clone(),
            amount: self.amount,
            direction: self.direction,
        }
    }
}
