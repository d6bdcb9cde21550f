//! Specificity scoring for successful attribute matches
//!
//! Score = operator weight × specificity length, where:
//!
//! - text `EQUALS`/`CONTAINS`: length of the rule value in characters
//! - numeric `EQUALS` (and `CONTAINS`, which behaves as equality): a fixed constant
//! - `NOT_EQUALS`/`NOT_CONTAINS`: a small fixed constant
//!
//! ```text
//! EQUALS (1000) > CONTAINS (100) > NOT_EQUALS (10) > NOT_CONTAINS (1)
//! ```

use serde::{Deserialize, Serialize};

use super::types::{AttrValue, Operator};

/// Multiplicative base per operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorWeights {
    pub equals: u64,
    pub contains: u64,
    pub not_equals: u64,
    pub not_contains: u64,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            equals: 1000,
            contains: 100,
            not_equals: 10,
            not_contains: 1,
        }
    }
}

impl OperatorWeights {
    pub fn weight(&self, operator: Operator) -> u64 {
        match operator {
            Operator::Equals => self.equals,
            Operator::Contains => self.contains,
            Operator::NotEquals => self.not_equals,
            Operator::NotContains => self.not_contains,
            Operator::Ignore => 0,
        }
    }
}

/// Specificity lengths for values whose length carries no meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificityConfig {
    /// Numeric equality is maximally specific regardless of magnitude
    pub numeric_equals: u64,
    /// Exclusion matchers (`NOT_EQUALS`, `NOT_CONTAINS`)
    pub exclusion: u64,
}

impl Default for SpecificityConfig {
    fn default() -> Self {
        Self {
            numeric_equals: 100,
            exclusion: 1,
        }
    }
}

/// Converts a successful match into a quality score
#[derive(Debug, Clone, Default)]
pub struct SpecificityScorer {
    weights: OperatorWeights,
    specificity: SpecificityConfig,
}

impl SpecificityScorer {
    pub fn new(weights: OperatorWeights, specificity: SpecificityConfig) -> Self {
        Self {
            weights,
            specificity,
        }
    }

    /// Score a successful match of `rule_value` under `operator`.
    ///
    /// Only the rule's comparison value determines specificity; the matched
    /// transaction value does not.
    pub fn score(&self, rule_value: &AttrValue, operator: Operator) -> u64 {
        self.weights
            .weight(operator)
            .saturating_mul(self.specificity_length(rule_value, operator))
    }

    fn specificity_length(&self, rule_value: &AttrValue, operator: Operator) -> u64 {
        match (operator, rule_value) {
            (Operator::Ignore, _) => 0,
            (op, _) if op.is_negated() => self.specificity.exclusion,
            (_, AttrValue::Text(s)) => s.chars().count() as u64,
            (_, AttrValue::Number(_)) => self.specificity.numeric_equals,
        }
    }
}
