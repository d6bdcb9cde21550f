//! Classification types

use serde::{Deserialize, Serialize};

use crate::fuzzy::FuzzyGuess;
use crate::rule::{AccountId, CategoryId, EntityId, Rule, RuleId};

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A user rule matched
    Rule,
    /// No rule matched; an entity name was guessed
    EntityGuess,
    /// No rule matched; a category name was guessed
    CategoryGuess,
    /// Nothing to suggest
    #[default]
    Unmatched,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rule => write!(f, "rule"),
            Self::EntityGuess => write!(f, "entity_guess"),
            Self::CategoryGuess => write!(f, "category_guess"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Suggested assignment for a transaction.
///
/// This is a partial patch: absent fields must not override the
/// transaction's existing values (see [`ClassificationResult::apply_to`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule_id: Option<RuleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_entity_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_account_from_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_account_to_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_is_essential: Option<bool>,
    pub origin: Origin,
    /// The fuzzy match behind a guessed entity or category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess: Option<FuzzyGuess>,
}

impl ClassificationResult {
    /// Nothing matched and nothing was guessed
    pub fn unmatched() -> Self {
        Self::default()
    }

    /// The winning rule's assignments, verbatim
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            matched_rule_id: Some(rule.id),
            assigned_category_id: rule.assign.category_id,
            assigned_entity_id: rule.assign.entity_id,
            assigned_account_from_id: rule.assign.account_from_id,
            assigned_account_to_id: rule.assign.account_to_id,
            assigned_is_essential: rule.assign.is_essential,
            origin: Origin::Rule,
            guess: None,
        }
    }

    pub fn from_entity_guess(guess: FuzzyGuess) -> Self {
        Self {
            assigned_entity_id: Some(guess.id),
            origin: Origin::EntityGuess,
            guess: Some(guess),
            ..Self::default()
        }
    }

    pub fn from_category_guess(guess: FuzzyGuess) -> Self {
        Self {
            assigned_category_id: Some(guess.id),
            origin: Origin::CategoryGuess,
            guess: Some(guess),
            ..Self::default()
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.origin == Origin::Unmatched
    }

    /// Apply the suggestion to a transaction's current assignment, leaving
    /// fields this result does not set untouched.
    pub fn apply_to(&self, target: &mut TransactionAssignment) {
        if let Some(id) = self.assigned_category_id {
            target.category_id = Some(id);
        }
        if let Some(id) = self.assigned_entity_id {
            target.entity_id = Some(id);
        }
        if let Some(id) = self.assigned_account_from_id {
            target.account_from_id = Some(id);
        }
        if let Some(id) = self.assigned_account_to_id {
            target.account_to_id = Some(id);
        }
        if let Some(is_essential) = self.assigned_is_essential {
            target.is_essential = is_essential;
        }
    }
}

/// The assignable fields of a transaction, as the caller currently holds them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionAssignment {
    pub category_id: Option<CategoryId>,
    pub entity_id: Option<EntityId>,
    pub account_from_id: Option<AccountId>,
    pub account_to_id: Option<AccountId>,
    #[serde(default)]
    pub is_essential: bool,
}
