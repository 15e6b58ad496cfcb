//! Classification orchestrator: picks the rule table for the transaction's
//! side, scores every rule keyword, and applies the threshold and fallbacks.

use tally_core::{ClassificationInput, ClassificationResult, Direction, RuleSide, Taxonomy};
use tracing::{debug, trace};

use crate::context::ContextTable;
use crate::error::RuleError;
use crate::rule_file::RuleFile;
use crate::rules::{CompiledRule, Keyword, RuleTables};
use crate::scorer::score_keyword;

pub const BASE_CONFIDENCE: f64 = 0.6;
/// A best match must score strictly above this to be reported directly.
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Floor for the credit-side "Other Income" fallback.
pub const INCOME_FALLBACK_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy)]
struct BestMatch<'a> {
    rule: &'a CompiledRule,
    confidence: f64,
}

impl BestMatch<'_> {
    fn into_result(self) -> ClassificationResult {
        ClassificationResult::new(self.rule.category(), self.rule.subcategory(), self.confidence)
    }
}

/// Stateless rule-based classifier.
///
/// Holds immutable tables only, so one instance can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTables,
    context: ContextTable,
}

impl Classifier {
    pub fn new(rules: RuleTables, context: ContextTable) -> Self {
        Self { rules, context }
    }

    /// Classifier over the embedded default rule file and taxonomy.
    pub fn builtin() -> Result<Self, RuleError> {
        RuleFile::builtin()?.into_classifier(&Taxonomy::builtin())
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    pub fn context(&self) -> &ContextTable {
        &self.context
    }

    pub fn classify(
        &self,
        description: &str,
        amount: f64,
        direction: Option<Direction>,
    ) -> ClassificationResult {
        let description = description.trim().to_lowercase();
        let side = RuleSide::resolve(direction, amount);
        let best = self.best_match(&description, amount, self.rules.for_side(side));

        let result = match best {
            Some(best) if best.confidence > CONFIDENCE_THRESHOLD => best.into_result(),
            _ if side.is_income() => ClassificationResult::other_income(
                best.map_or(0.0, |b| b.confidence)
                    .max(INCOME_FALLBACK_CONFIDENCE),
            ),
            // Debit side keeps a weak match rather than the generic default.
            Some(best) => best.into_result(),
            None => ClassificationResult::uncategorized(),
        };

        debug!(
            ?side,
            category = %result.category,
            subcategory = %result.subcategory,
            confidence = result.confidence,
            matched = best.is_some(),
            "classified transaction"
        );

        result
    }

    pub fn classify_input(&self, input: &ClassificationInput) -> ClassificationResult {
        self.classify(&input.description, input.amount, input.direction)
    }

    /// Independent classification of each input, in order.
    pub fn classify_batch(&self, inputs: &[ClassificationInput]) -> Vec<ClassificationResult> {
        inputs.iter().map(|i| self.classify_input(i)).collect()
    }

    /// Confidence of `rule` firing on `keyword`, or `None` when the keyword is
    /// absent. `description` must already be trimmed and lowercased.
    pub fn keyword_confidence(
        &self,
        description: &str,
        amount: f64,
        rule: &CompiledRule,
        keyword: &Keyword,
    ) -> Option<f64> {
        let hit = score_keyword(description, keyword);
        if !hit.is_match {
            return None;
        }

        let bonus = self.context.bonus(description, rule.category(), amount);
        let penalty = self
            .context
            .penalty(description, keyword.as_str(), self.rules.corpus());
        let confidence = (BASE_CONFIDENCE + hit.score + bonus - penalty).clamp(0.0, MAX_CONFIDENCE);

        trace!(
            keyword = keyword.as_str(),
            category = %rule.category(),
            score = hit.score,
            bonus,
            penalty,
            confidence,
            "keyword hit"
        );

        Some(confidence)
    }

    fn best_match<'a>(
        &self,
        description: &str,
        amount: f64,
        rules: &'a [CompiledRule],
    ) -> Option<BestMatch<'a>> {
        let mut best: Option<BestMatch<'a>> = None;

        for rule in rules {
            for keyword in rule.keywords() {
                let Some(confidence) = self.keyword_confidence(description, amount, rule, keyword)
                else {
                    continue;
                };
                // Strict `>`: the earlier rule keeps a tie.
                if best.is_none_or(|b| confidence > b.confidence) {
                    best = Some(BestMatch { rule, confidence });
                }
            }
        }

        best
    }
}
