//! Transaction classification
//!
//! Produces a suggested assignment for a transaction:
//!
//! 1. **Rules**: the user's best-matching rule, if any, supplies every
//!    assignment it carries
//! 2. **Entity guess**: otherwise the description is fuzzy-matched against
//!    the user's entity names
//! 3. **Category guess**: failing that, against the user's category names
//!
//! A guess assigns exactly one field. When nothing matches the result is
//! empty and the transaction is left as is.
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::classify::{Classifier, Origin};
//! use tally_core::rule::{Operator, Rule, TransactionType};
//! use tally_core::storage::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.add_rule(
//!     Rule::builder(1, 42)
//!         .description(Operator::Contains, "rent")
//!         .assign_category(7)
//!         .build(),
//! );
//! store.add_entity(42, 5, "LIDL");
//!
//! let classifier = Classifier::new(store);
//!
//! let rent = classifier
//!     .classify(42, "RENT MARCH", Decimal::from(700), TransactionType::Expense, None, None)
//!     .unwrap();
//! assert_eq!(rent.assigned_category_id, Some(7));
//!
//! let groceries = classifier
//!     .classify(42, "COMPRA LIDL VAGOS", Decimal::from(12), TransactionType::Expense, None, None)
//!     .unwrap();
//! assert_eq!(groceries.origin, Origin::EntityGuess);
//! assert_eq!(groceries.assigned_entity_id, Some(5));
//! ```

mod classifier;
mod fallback;
mod types;

pub use classifier::{Classifier, ClassifierSnapshot};
pub use fallback::{FallbackChain, FallbackKind};
pub use types::{ClassificationResult, Origin, TransactionAssignment};
