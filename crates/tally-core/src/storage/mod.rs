//! Storage abstraction for classification inputs
//!
//! The classifier never persists anything. It reads rules and fuzzy
//! candidates through two traits:
//!
//! - [`RuleSource`]: a user's rules
//! - [`CandidateSource`]: a user's entity and category names
//!
//! Implementations exist for:
//!
//! - **Memory**: In-memory storage for testing (`MemoryStore`)
//! - **SQLite**: Native SQLite via rusqlite (separate crate, `tally-sqlite`)
//!
//! # Example
//!
//! ```rust
//! use tally_core::rule::{Operator, Rule};
//! use tally_core::storage::{MemoryStore, RuleSource};
//!
//! let mut store = MemoryStore::new();
//! store.add_rule(Rule::builder(1, 42).description(Operator::Contains, "lidl").build());
//!
//! assert_eq!(store.rules_for_user(42).unwrap().len(), 1);
//! assert!(store.rules_for_user(7).unwrap().is_empty());
//! ```

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{CandidateSource, RuleSource};
