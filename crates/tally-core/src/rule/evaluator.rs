//! Rule evaluation against a single transaction

use tracing::trace;

use super::matcher::{match_attribute, MatchOutcome};
use super::scoring::SpecificityScorer;
use super::types::{Attribute, Rule, TransactionCandidate};

/// Result of evaluating one rule against one transaction
#[derive(Debug, Clone)]
pub struct Evaluation<'r> {
    pub rule: &'r Rule,
    /// The rule cannot win for this transaction
    pub disqualified: bool,
    /// First attribute that failed, if any
    pub failed_on: Option<Attribute>,
    /// Per-attribute scores of the matchers that matched, in evaluation order
    pub matched: Vec<(Attribute, u64)>,
}

impl Evaluation<'_> {
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn total_score(&self) -> u64 {
        self.matched
            .iter()
            .fold(0u64, |acc, (_, score)| acc.saturating_add(*score))
    }
}

/// Evaluates every matcher of a rule with AND semantics
#[derive(Debug, Clone, Default)]
pub struct RuleEvaluator {
    scorer: SpecificityScorer,
}

impl RuleEvaluator {
    pub fn new(scorer: SpecificityScorer) -> Self {
        Self { scorer }
    }

    /// Evaluate description, amount, type, account_to and account_from in that
    /// order. The first failing matcher disqualifies the rule; a rule with no
    /// matching attribute at all is disqualified as well.
    pub fn evaluate<'r>(&self, rule: &'r Rule, candidate: &TransactionCandidate) -> Evaluation<'r> {
        let mut matched = Vec::with_capacity(Attribute::EVALUATION_ORDER.len());

        for attribute in Attribute::EVALUATION_ORDER {
            let matcher = rule.matcher(attribute);
            match match_attribute(candidate.attribute(attribute), matcher) {
                MatchOutcome::Ignored => {}
                MatchOutcome::Failed => {
                    trace!(rule_id = rule.id, %attribute, "rule failed");
                    return Evaluation {
                        rule,
                        disqualified: true,
                        failed_on: Some(attribute),
                        matched,
                    };
                }
                MatchOutcome::Matched => {
                    // A match always carries a value; see match_attribute
                    let score = matcher
                        .value
                        .as_ref()
                        .map(|value| self.scorer.score(value, matcher.operator))
                        .unwrap_or(0);
                    matched.push((attribute, score));
                }
            }
        }

        let disqualified = matched.is_empty();
        if disqualified {
            trace!(rule_id = rule.id, "rule has no participating matcher");
        }
        Evaluation {
            rule,
            disqualified,
            failed_on: None,
            matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::types::{Operator, TransactionType};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn expense(description: &str, amount: i64) -> TransactionCandidate {
        TransactionCandidate::new(description, Decimal::from(amount), TransactionType::Expense)
    }

    #[test]
    fn records_scores_for_every_matched_attribute() {
        let rule = Rule::builder(1, 1)
            .description(Operator::Contains, "match")
            .amount(Operator::Equals, Decimal::from(1990))
            .transaction_type(Operator::Equals, TransactionType::Expense)
            .build();

        let eval = RuleEvaluator::default().evaluate(&rule, &expense("this will match", 1990));

        assert!(!eval.disqualified);
        assert_eq!(
            eval.matched,
            vec![
                (Attribute::Description, 500),
                (Attribute::Amount, 100_000),
                (Attribute::Type, 1_000),
            ]
        );
        assert_eq!(eval.total_score(), 101_500);
    }

    #[test]
    fn one_failed_attribute_disqualifies() {
        let rule = Rule::builder(1, 1)
            .description(Operator::Contains, "match")
            .amount(Operator::Equals, Decimal::from(1990))
            .build();

        let eval = RuleEvaluator::default().evaluate(&rule, &expense("this will match", 1991));

        assert!(eval.disqualified);
        assert_eq!(eval.failed_on, Some(Attribute::Amount));
    }

    #[test]
    fn all_ignored_never_matches() {
        let rule = Rule::builder(1, 1).assign_category(3).build();
        let eval = RuleEvaluator::default().evaluate(&rule, &expense("anything", 1));
        assert!(eval.disqualified);
        assert_eq!(eval.failed_on, None);
        assert_eq!(eval.matched_count(), 0);
    }

    #[test]
    fn not_applicable_accounts_are_skipped() {
        let rule = Rule::builder(1, 1)
            .description(Operator::Contains, "rent")
            .account_from(Operator::Equals, 9)
            .build();

        let eval = RuleEvaluator::default().evaluate(&rule, &expense("RENT MARCH", 800));
        assert!(!eval.disqualified);
        assert_eq!(eval.matched_count(), 1);

        let with_other_account = expense("RENT MARCH", 800).with_account_from(2);
        let eval = RuleEvaluator::default().evaluate(&rule, &with_other_account);
        assert!(eval.disqualified);
        assert_eq!(eval.failed_on, Some(Attribute::AccountFrom));
    }

    #[test]
    fn account_to_is_evaluated_before_account_from() {
        let rule = Rule::builder(1, 1)
            .account_from(Operator::Equals, 1)
            .account_to(Operator::Equals, 2)
            .build();
        let txn = TransactionCandidate::new("move", Decimal::from(5), TransactionType::Transfer)
            .with_account_from(7)
            .with_account_to(8);

        let eval = RuleEvaluator::default().evaluate(&rule, &txn);
        assert_eq!(eval.failed_on, Some(Attribute::AccountTo));
    }
}
