//! Fallback cascade used when no rule matches
//!
//! Strategies are tried in the configured order; the first one that produces
//! a guess wins. The default order is entity, then category.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::ClassificationResult;
use crate::fuzzy::FuzzyGuess;

/// One fallback strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// Guess a counterparty entity from its name
    Entity,
    /// Guess a category from its name
    Category,
}

impl FallbackKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entity" | "entities" => Some(Self::Entity),
            "category" | "categories" => Some(Self::Category),
            _ => None,
        }
    }

    /// Default cascade: entity first, then category
    pub fn default_order() -> Vec<FallbackKind> {
        vec![Self::Entity, Self::Category]
    }

    fn into_result(self, guess: FuzzyGuess) -> ClassificationResult {
        match self {
            Self::Entity => ClassificationResult::from_entity_guess(guess),
            Self::Category => ClassificationResult::from_category_guess(guess),
        }
    }
}

impl std::fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity => write!(f, "entity"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// Ordered list of fallback strategies
#[derive(Debug, Clone)]
pub struct FallbackChain {
    order: Vec<FallbackKind>,
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::new(FallbackKind::default_order())
    }
}

impl FallbackChain {
    pub fn new(order: Vec<FallbackKind>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[FallbackKind] {
        &self.order
    }

    /// Try each strategy in order through `attempt`, returning on the first
    /// guess. `attempt` is only called for strategies actually reached, so
    /// later candidate lists are never loaded once an earlier one succeeds.
    pub fn run<E, F>(&self, mut attempt: F) -> Result<ClassificationResult, E>
    where
        F: FnMut(FallbackKind) -> Result<Option<FuzzyGuess>, E>,
    {
        for kind in &self.order {
            if let Some(guess) = attempt(*kind)? {
                debug!(strategy = %kind, id = guess.id, score = guess.score, "fallback guess");
                return Ok(kind.into_result(guess));
            }
        }
        debug!("no fallback guess");
        Ok(ClassificationResult::unmatched())
    }
}
