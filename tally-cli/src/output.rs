//! Text and JSON rendering for CLI results.

use anyhow::Result;
use serde::Serialize;
use tally_core::{ClassificationResult, Direction, Taxonomy};
use tally_finance::CategoryTally;
use tally_ingest::StatementTransaction;

#[derive(Debug, Serialize)]
pub struct ClassifiedRow<'a> {
    pub date: Option<chrono::NaiveDate>,
    pub description: &'a str,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(flatten)]
    pub result: &'a ClassificationResult,
}

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    transactions: Vec<ClassifiedRow<'a>>,
    summary: &'a [CategoryTally],
}

pub fn format_row(row: &ClassifiedRow<'_>) -> String {
    let date = row
        .date
        .map(|d| format!("{d} | "))
        .unwrap_or_default();
    format!(
        "{date}[{}] {} | confidence={:.2} | {} | {:.2}",
        row.result.category,
        row.result.subcategory,
        row.result.confidence,
        row.description,
        row.amount
    )
}

pub fn print_single(row: &ClassifiedRow<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(row)?);
    } else {
        println!("{}", format_row(row));
    }
    Ok(())
}

pub fn print_batch(
    txns: &[StatementTransaction],
    results: &[ClassificationResult],
    summary: &[CategoryTally],
    taxonomy: &Taxonomy,
    json: bool,
) -> Result<()> {
    let rows: Vec<ClassifiedRow<'_>> = txns
        .iter()
        .zip(results)
        .map(|(t, r)| ClassifiedRow {
            date: Some(t.date),
            description: &t.description,
            amount: t.amount,
            direction: t.direction,
            result: r,
        })
        .collect();

    if json {
        let report = BatchReport {
            transactions: rows,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Classified {} transactions\n", rows.len());
    for row in &rows {
        println!("{}", format_row(row));
    }

    println!("\n## By category\n");
    for t in summary {
        let name = taxonomy.get(t.category).map_or(t.category.as_str(), |c| c.name);
        println!(
            "- {name}: count={} | total={:.2}",
            t.transaction_count, t.total_amount
        );
    }
    Ok(())
}

pub fn print_categories(taxonomy: &Taxonomy, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(taxonomy.list())?);
        return Ok(());
    }
    for c in taxonomy.list() {
        println!(
            "{:<14} {:<18} icon={} color={}",
            c.id.as_str(),
            c.name,
            c.presentation.icon,
            c.presentation.color
        );
        if !c.subcategories.is_empty() {
            println!("{:<14} {}", "", c.subcategories.join(", "));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::CategoryId;

    #[test]
    fn test_format_row_with_date() {
        let result = ClassificationResult::new(CategoryId::Food, "Supermercados", 0.95);
        let row = ClassifiedRow {
            date: chrono::NaiveDate::from_ymd_opt(2026, 2, 3),
            description: "MERCADONA MADRID",
            amount: -45.3,
            direction: Some(Direction::Debit),
            result: &result,
        };
        assert_eq!(
            format_row(&row),
            "2026-02-03 | [food] Supermercados | confidence=0.95 | MERCADONA MADRID | -45.30"
        );
    }

    #[test]
    fn test_row_json_flattens_result() {
        let result = ClassificationResult::uncategorized();
        let row = ClassifiedRow {
            date: None,
            description: "",
            amount: -10.0,
            direction: None,
            result: &result,
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["category"], "other");
        assert_eq!(v["subcategory"], "Uncategorized");
        assert!(v.get("direction").is_none());
        assert_eq!(
            format_row(&row),
            "[other] Uncategorized | confidence=0.10 |  | -10.00"
        );
    }
}
