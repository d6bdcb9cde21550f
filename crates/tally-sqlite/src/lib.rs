//! SQLite storage backend for Tally
//!
//! This crate provides a persistent SQLite implementation of the tally-core
//! collaborator traits, so the classifier can read a user's rules, entity
//! names and category names from disk.
//!
//! # Features
//!
//! - Implements `RuleSource` and `CandidateSource`
//! - Embedded, idempotent schema migrations
//! - Supports in-memory databases for testing
//! - Stored matcher values are typed once at load time
//!
//! # Example
//!
//! ```rust,no_run
//! use tally_core::{Classifier, Operator, Rule, TransactionCandidate, TransactionType};
//! use tally_sqlite::SqliteStore;
//! use rust_decimal::Decimal;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::in_memory()?;
//! store.insert_rule(
//!     &Rule::builder(1, 42)
//!         .description(Operator::Contains, "rent")
//!         .assign_category(7)
//!         .build(),
//! )?;
//! store.insert_entity(42, 5, "LIDL")?;
//!
//! let classifier = Classifier::new(store);
//! let txn = TransactionCandidate::new("RENT MARCH", Decimal::from(700), TransactionType::Expense);
//! let result = classifier.classify_candidate(42, &txn)?;
//! assert_eq!(result.assigned_category_id, Some(7));
//! # Ok(())
//! # }
//! ```

mod columns;
pub mod error;
pub mod migrate;
pub mod store;

// Re-export main types
pub use error::{Result, SqliteError};
pub use store::SqliteStore;
