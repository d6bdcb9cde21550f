//! Fuzzy fallback matching
//!
//! Used only when no rule matches a transaction. The description and every
//! candidate name are normalized (diacritics stripped, punctuation removed,
//! upper-cased) and compared with a token-set similarity that tolerates the
//! boilerplate a bank statement line wraps around a merchant name.
//!
//! # Example
//!
//! ```rust
//! use tally_core::fuzzy::{FuzzyCandidate, FuzzyMatcher};
//!
//! let matcher = FuzzyMatcher::default();
//! let guess = matcher
//!     .guess("COMPRA LIDL VAGOS", &[FuzzyCandidate::new(5, "LIDL")])
//!     .unwrap();
//! assert_eq!(guess.id, 5);
//! ```

mod engine;
mod normalize;
mod similarity;

pub use engine::{
    guess_with_threshold, CandidateSet, FuzzyCandidate, FuzzyConfig, FuzzyGuess, FuzzyMatcher,
};
pub use normalize::normalize;
pub use similarity::{ratio, token_set_ratio};
