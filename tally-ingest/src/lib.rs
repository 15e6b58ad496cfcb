//! tally-ingest: the transaction list handed to the classifier, and a CSV
//! reader that produces it.

pub mod csv_statement;
pub mod types;

pub use csv_statement::{parse_statement_csv, parse_statement_reader};
pub use types::StatementTransaction;
