//! Rule matching, scoring and ranking
//!
//! A rule carries up to five matchers (description, amount, type, account_to,
//! account_from). A rule wins for a transaction only if every non-ignored
//! matcher matches; among winners the most specific one is selected.
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::rule::{Operator, Rule, RuleRanker, TransactionCandidate, TransactionType};
//!
//! let rules = vec![
//!     Rule::builder(1, 1).description(Operator::Contains, "match").assign_category(10).build(),
//!     Rule::builder(2, 1)
//!         .description(Operator::Contains, "match")
//!         .amount(Operator::Equals, Decimal::from(1990))
//!         .assign_category(20)
//!         .build(),
//! ];
//! let txn = TransactionCandidate::new("this will match", Decimal::from(1990), TransactionType::Expense);
//!
//! let winner = RuleRanker::default().best_match(&rules, &txn).unwrap();
//! assert_eq!(winner.rule.assign.category_id, Some(20));
//! ```

mod evaluator;
mod matcher;
mod ranker;
mod scoring;
mod types;

pub use evaluator::{Evaluation, RuleEvaluator};
pub use matcher::{match_attribute, MatchOutcome};
pub use ranker::{RankedRule, RuleRanker};
pub use scoring::{OperatorWeights, SpecificityConfig, SpecificityScorer};
pub use types::{
    AccountId, Assignments, AttrRef, AttrValue, Attribute, CategoryId, EntityId, Matcher,
    Operator, Rule, RuleBuilder, RuleId, TransactionCandidate, TransactionType, UserId,
};
