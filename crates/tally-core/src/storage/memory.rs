//! In-memory storage backend
//!
//! A simple HashMap-based implementation for testing and development.
//! Not suitable for production use due to lack of persistence.

use std::collections::HashMap;

use crate::fuzzy::FuzzyCandidate;
use crate::rule::{Rule, UserId};
use crate::storage::error::StoreResult;
use crate::storage::traits::{CandidateSource, RuleSource};

/// In-memory rule and candidate store, partitioned by user.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rules: HashMap<UserId, Vec<Rule>>,
    entities: HashMap<UserId, Vec<FuzzyCandidate>>,
    categories: HashMap<UserId, Vec<FuzzyCandidate>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store with initial rules.
    pub fn with_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut store = Self::new();
        for rule in rules {
            store.add_rule(rule);
        }
        store
    }

    /// Add a rule under its owning user.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.entry(rule.user_id).or_default().push(rule);
    }

    pub fn add_entity(&mut self, user_id: UserId, id: i64, name: impl Into<String>) {
        self.entities
            .entry(user_id)
            .or_default()
            .push(FuzzyCandidate::new(id, name));
    }

    pub fn add_category(&mut self, user_id: UserId, id: i64, name: impl Into<String>) {
        self.categories
            .entry(user_id)
            .or_default()
            .push(FuzzyCandidate::new(id, name));
    }
}

impl RuleSource for MemoryStore {
    fn rules_for_user(&self, user_id: UserId) -> StoreResult<Vec<Rule>> {
        Ok(self.rules.get(&user_id).cloned().unwrap_or_default())
    }
}

impl CandidateSource for MemoryStore {
    fn entity_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>> {
        Ok(self.entities.get(&user_id).cloned().unwrap_or_default())
    }

    fn category_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>> {
        Ok(self.categories.get(&user_id).cloned().unwrap_or_default())
    }
}
