//! Tally Core Engine
//!
//! This crate provides the classification kernel for Tally: given a bank
//! transaction, suggest its category, entity, accounts and essential flag.
//!
//! # Features
//!
//! - `parallel` - Classify bulk imports across threads via rayon
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::{Classifier, MemoryStore, Operator, Rule, TransactionCandidate, TransactionType};
//!
//! let store = MemoryStore::with_rules([Rule::builder(1, 42)
//!     .description(Operator::Contains, "netflix")
//!     .transaction_type(Operator::Equals, TransactionType::Expense)
//!     .assign_category(3)
//!     .assign_essential(false)
//!     .build()]);
//!
//! let classifier = Classifier::new(store);
//! let txn = TransactionCandidate::new("NETFLIX.COM", Decimal::new(1199, 2), TransactionType::Expense);
//! let result = classifier.classify_candidate(42, &txn).unwrap();
//!
//! assert_eq!(result.matched_rule_id, Some(1));
//! assert_eq!(result.assigned_is_essential, Some(false));
//! ```

pub mod classify;
pub mod config;
pub mod fuzzy;
pub mod rule;
pub mod storage;

// Re-export main types at crate root
pub use classify::{
    ClassificationResult, Classifier, ClassifierSnapshot, FallbackChain, FallbackKind, Origin,
    TransactionAssignment,
};
pub use config::EngineConfig;
pub use fuzzy::{FuzzyCandidate, FuzzyConfig, FuzzyGuess, FuzzyMatcher};
pub use rule::{
    AttrValue, Attribute, Matcher, Operator, OperatorWeights, Rule, RuleRanker,
    SpecificityConfig, TransactionCandidate, TransactionType,
};
pub use storage::{CandidateSource, MemoryStore, RuleSource, StoreError, StoreResult};
