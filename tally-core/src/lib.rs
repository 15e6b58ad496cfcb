//! tally-core: category ids, the display taxonomy, and the transaction
//! input/output types shared by the classifier and its collaborators.

pub mod category;
pub mod error;
pub mod taxonomy;
pub mod transaction;

pub use category::CategoryId;
pub use error::TaxonomyError;
pub use taxonomy::{Presentation, Taxonomy, TransactionCategory};
pub use transaction::{
    ClassificationInput, ClassificationResult, Direction, RuleSide, GENERAL_SUBCATEGORY,
    OTHER_INCOME_SUBCATEGORY, UNCATEGORIZED_SUBCATEGORY,
};
