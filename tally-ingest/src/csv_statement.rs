//! Generic statement CSV:
//!
//! date,description,amount[,direction]
//!
//! Dates are `YYYY-MM-DD` or `DD/MM/YYYY`. Amounts are `-1,234.56` or
//! `-1.234,56` style; when both readings fit, the first wins.
//! `direction` is exactly `credit`, `debit` or blank.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use regex::Regex;
use std::io::Read;
use std::path::Path;
use tally_core::Direction;

use crate::types::StatementTransaction;

/// Parse a statement CSV file.
pub fn parse_statement_csv(path: impl AsRef<Path>) -> Result<Vec<StatementTransaction>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_statement_reader(file).with_context(|| format!("parsing {}", path.display()))
}

/// Parse statement CSV from any reader. Rows with a blank date are skipped.
pub fn parse_statement_reader<R: Read>(reader: R) -> Result<Vec<StatementTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(date_col), Some(desc_col), Some(amount_col)) =
        (column("date"), column("description"), column("amount"))
    else {
        bail!("expected headers date,description,amount[,direction]; got {:?}", headers);
    };
    let direction_col = column("direction");
    let amounts = AmountFormats::new()?;

    let mut txns = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let date_str = record.get(date_col).unwrap_or("");
        if date_str.is_empty() {
            continue;
        }

        let date = parse_date(date_str).with_context(|| format!("line {line}: bad date"))?;
        let amount = amounts
            .parse(record.get(amount_col).unwrap_or(""))
            .with_context(|| format!("line {line}: bad amount"))?;
        let direction = match direction_col.and_then(|c| record.get(c)) {
            None | Some("") => None,
            Some(s) => Some(
                s.parse::<Direction>()
                    .with_context(|| format!("line {line}: bad direction"))?,
            ),
        };

        txns.push(StatementTransaction {
            date,
            description: record.get(desc_col).unwrap_or("").to_string(),
            amount,
            direction,
        });
    }

    Ok(txns)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .with_context(|| format!("`{s}` is neither YYYY-MM-DD nor DD/MM/YYYY"))
}

struct AmountFormats {
    dot_decimal: Regex,
    comma_decimal: Regex,
}

impl AmountFormats {
    fn new() -> Result<Self> {
        Ok(Self {
            dot_decimal: Regex::new(r"^-?([0-9]{1,3}(,[0-9]{3})+|[0-9]+)(\.[0-9]+)?$")?,
            comma_decimal: Regex::new(r"^-?([0-9]{1,3}(\.[0-9]{3})+|[0-9]+),[0-9]+$")?,
        })
    }

    fn parse(&self, s: &str) -> Result<f64> {
        let normalized = if self.dot_decimal.is_match(s) {
            s.replace(',', "")
        } else if self.comma_decimal.is_match(s) {
            s.replace('.', "").replace(',', ".")
        } else {
            bail!("`{s}` is not a number");
        };
        normalized
            .parse::<f64>()
            .with_context(|| format!("`{s}` is not a number"))
    }
}
