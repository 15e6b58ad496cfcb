//! Per-category totals over a classified batch, for terminal reporting.

use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::{CategoryId, ClassificationInput, ClassificationResult};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTally {
    pub category: CategoryId,
    pub transaction_count: usize,
    /// Sum of absolute amounts.
    pub total_amount: f64,
}

/// Group `inputs` by their paired result's category, in taxonomy order.
///
/// Pairs beyond the shorter of the two slices are ignored.
pub fn summarize(
    inputs: &[ClassificationInput],
    results: &[ClassificationResult],
) -> Vec<CategoryTally> {
    let mut groups: BTreeMap<CategoryId, (usize, f64)> = BTreeMap::new();

    for (input, result) in inputs.iter().zip(results) {
        let entry = groups.entry(result.category).or_default();
        entry.0 += 1;
        if input.amount.is_finite() {
            entry.1 += input.amount.abs();
        }
    }

    groups
        .into_iter()
        .map(|(category, (transaction_count, total_amount))| CategoryTally {
            category,
            transaction_count,
            total_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_in_taxonomy_order() {
        let inputs = vec![
            ClassificationInput::new("a", -10.0),
            ClassificationInput::new("b", 1500.0),
            ClassificationInput::new("c", -5.5),
            ClassificationInput::new("d", -1.0),
        ];
        let results = vec![
            ClassificationResult::new(CategoryId::Food, "Supermercados", 0.95),
            ClassificationResult::new(CategoryId::Income, "Salario", 0.95),
            ClassificationResult::new(CategoryId::Food, "Delivery", 0.9),
            ClassificationResult::uncategorized(),
        ];

        let tallies = summarize(&inputs, &results);
        assert_eq!(tallies.len(), 3);
        assert_eq!(tallies[0].category, CategoryId::Income);
        assert_eq!(tallies[1].category, CategoryId::Food);
        assert_eq!(tallies[1].transaction_count, 2);
        assert!((tallies[1].total_amount - 15.5).abs() < 1e-9);
        assert_eq!(tallies[2].category, CategoryId::Other);
    }

    #[test]
    fn test_nan_amount_counts_but_adds_nothing() {
        let inputs = vec![ClassificationInput::new("x", f64::NAN)];
        let results = vec![ClassificationResult::uncategorized()];
        let tallies = summarize(&inputs, &results);
        assert_eq!(tallies[0].transaction_count, 1);
        assert_eq!(tallies[0].total_amount, 0.0);
    }
}
