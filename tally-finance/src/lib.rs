//! tally-finance: rule tables, keyword scoring, contextual adjustment and the
//! classification orchestrator.

pub mod classifier;
pub mod context;
pub mod error;
pub mod rule_file;
pub mod rules;
pub mod scorer;
pub mod summary;

pub use classifier::Classifier;
pub use context::{AmountHint, ContextRules, ContextTable};
pub use error::RuleError;
pub use rule_file::{DEFAULT_RULES_TOML, RuleFile, load_classifier};
pub use rules::{CategoryRule, CompiledRule, Keyword, RuleTable, RuleTables};
pub use scorer::{KeywordMatch, score_keyword};
pub use summary::{CategoryTally, summarize};
