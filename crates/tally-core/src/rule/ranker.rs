//! Rule ranking with deterministic tie-breaking
//!
//! Among rules that survive evaluation, the winner is chosen by:
//!
//! 1. Matched-attribute count, descending
//! 2. Sum of per-attribute scores, descending
//! 3. Rule id, ascending
//!
//! Rules that tie on all three keep the first one encountered.

use tracing::debug;

use super::evaluator::{Evaluation, RuleEvaluator};
use super::scoring::{OperatorWeights, SpecificityConfig, SpecificityScorer};
use super::types::{Rule, TransactionCandidate};

/// The selected rule with the figures it won on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedRule<'r> {
    pub rule: &'r Rule,
    pub matched_count: usize,
    pub total_score: u64,
}

impl RankedRule<'_> {
    fn outranks(&self, other: &RankedRule<'_>) -> bool {
        (self.matched_count, self.total_score, std::cmp::Reverse(self.rule.id))
            > (other.matched_count, other.total_score, std::cmp::Reverse(other.rule.id))
    }
}

/// Selects the best-matching rule for a transaction
#[derive(Debug, Clone, Default)]
pub struct RuleRanker {
    evaluator: RuleEvaluator,
}

impl RuleRanker {
    pub fn new(weights: OperatorWeights, specificity: SpecificityConfig) -> Self {
        Self {
            evaluator: RuleEvaluator::new(SpecificityScorer::new(weights, specificity)),
        }
    }

    /// Pick the winner among already-evaluated rules
    pub fn rank<'r, I>(&self, evaluations: I) -> Option<RankedRule<'r>>
    where
        I: IntoIterator<Item = Evaluation<'r>>,
    {
        evaluations
            .into_iter()
            .filter(|eval| !eval.disqualified)
            .map(|eval| RankedRule {
                rule: eval.rule,
                matched_count: eval.matched_count(),
                total_score: eval.total_score(),
            })
            .fold(None, |best: Option<RankedRule<'r>>, current| match best {
                Some(best) if !current.outranks(&best) => Some(best),
                _ => Some(current),
            })
    }

    /// Evaluate every rule against the transaction and pick the winner
    pub fn best_match<'r>(
        &self,
        rules: &'r [Rule],
        candidate: &TransactionCandidate,
    ) -> Option<RankedRule<'r>> {
        let winner = self.rank(
            rules
                .iter()
                .map(|rule| self.evaluator.evaluate(rule, candidate)),
        );

        match &winner {
            Some(w) => debug!(
                rule_id = w.rule.id,
                matched = w.matched_count,
                score = w.total_score,
                candidates = rules.len(),
                "rule selected"
            ),
            None => debug!(candidates = rules.len(), "no rule matched"),
        }

        winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::types::{Operator, TransactionType};
    use rust_decimal::Decimal;

    fn expense(description: &str, amount: i64) -> TransactionCandidate {
        TransactionCandidate::new(description, Decimal::from(amount), TransactionType::Expense)
    }

    #[test]
    fn more_matched_attributes_win() {
        let rules = vec![
            Rule::builder(1, 1)
                .description(Operator::Contains, "match")
                .assign_category(10)
                .build(),
            Rule::builder(2, 1)
                .description(Operator::Contains, "match")
                .amount(Operator::Equals, Decimal::from(1990))
                .assign_category(20)
                .build(),
        ];

        let winner = RuleRanker::default()
            .best_match(&rules, &expense("this will match", 1990))
            .unwrap();
        assert_eq!(winner.rule.assign.category_id, Some(20));
        assert_eq!(winner.matched_count, 2);
    }

    #[test]
    fn count_beats_score() {
        let long = "a very specific and long merchant description";
        let rules = vec![
            Rule::builder(1, 1).description(Operator::Equals, long).build(),
            Rule::builder(2, 1)
                .description(Operator::NotContains, "zzz")
                .transaction_type(Operator::NotEquals, TransactionType::Income)
                .build(),
        ];

        let winner = RuleRanker::default().best_match(&rules, &expense(long, 1)).unwrap();
        assert_eq!(winner.rule.id, 2);
    }

    #[test]
    fn equals_beats_contains() {
        let rules = vec![
            Rule::builder(1, 1).description(Operator::Contains, "netflix").build(),
            Rule::builder(2, 1).description(Operator::Equals, "netflix").build(),
        ];

        let winner = RuleRanker::default().best_match(&rules, &expense("NETFLIX", 1)).unwrap();
        assert_eq!(winner.rule.id, 2);
    }

    #[test]
    fn longer_value_wins_within_operator() {
        let rules = vec![
            Rule::builder(1, 1).description(Operator::Contains, "amazon").build(),
            Rule::builder(2, 1).description(Operator::Contains, "amazon prime").build(),
        ];

        let winner = RuleRanker::default()
            .best_match(&rules, &expense("AMAZON PRIME VIDEO", 1))
            .unwrap();
        assert_eq!(winner.rule.id, 2);
    }

    #[test]
    fn full_tie_prefers_lowest_id_regardless_of_order() {
        let a = Rule::builder(7, 1).description(Operator::Contains, "gym").build();
        let b = Rule::builder(3, 1).description(Operator::Contains, "gym").build();

        let ranker = RuleRanker::default();
        let txn = expense("GYM MEMBERSHIP", 30);
        let forward = vec![a.clone(), b.clone()];
        let backward = vec![b, a];

        assert_eq!(ranker.best_match(&forward, &txn).unwrap().rule.id, 3);
        assert_eq!(ranker.best_match(&backward, &txn).unwrap().rule.id, 3);
    }

    #[test]
    fn no_survivors() {
        let rules = vec![
            Rule::builder(1, 1).description(Operator::Equals, "other").build(),
            Rule::builder(2, 1).build(),
        ];
        assert!(RuleRanker::default().best_match(&rules, &expense("x", 1)).is_none());
        assert!(RuleRanker::default().best_match(&[], &expense("x", 1)).is_none());
    }

    #[test]
    fn custom_weights_change_the_winner() {
        let rules = vec![
            Rule::builder(1, 1).description(Operator::Contains, "coffee").build(),
            Rule::builder(2, 1).description(Operator::NotContains, "tea").build(),
        ];
        let txn = expense("COFFEE SHOP", 4);

        let default = RuleRanker::default().best_match(&rules, &txn).unwrap();
        assert_eq!(default.rule.id, 1);

        let inverted = RuleRanker::new(
            OperatorWeights {
                contains: 1,
                not_contains: 1000,
                ..Default::default()
            },
            SpecificityConfig::default(),
        );
        assert_eq!(inverted.best_match(&rules, &txn).unwrap().rule.id, 2);
    }
}
