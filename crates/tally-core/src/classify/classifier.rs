//! Classifier - rule ranking with fuzzy fallback
//!
//! Orchestrates one classification: load the user's rules, rank them against
//! the transaction, and when nothing wins fall back to guessing an entity or a
//! category from the description.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::fallback::{FallbackChain, FallbackKind};
use super::types::ClassificationResult;
use crate::config::EngineConfig;
use crate::fuzzy::{normalize, CandidateSet, FuzzyMatcher};
use crate::rule::{AccountId, Rule, RuleRanker, TransactionCandidate, TransactionType, UserId};
use crate::storage::{CandidateSource, RuleSource, StoreError, StoreResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Transaction classifier over a rule and candidate store.
///
/// Stateless between calls: every classification reads fresh data from the
/// store, so concurrent use only needs a store that is safe to share.
#[derive(Debug, Clone)]
pub struct Classifier<S> {
    store: S,
    ranker: RuleRanker,
    fuzzy: FuzzyMatcher,
    fallback: FallbackChain,
}

impl<S> Classifier<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &EngineConfig::default())
    }

    pub fn with_config(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            ranker: RuleRanker::new(config.weights.clone(), config.specificity.clone()),
            fuzzy: FuzzyMatcher::new(config.fuzzy.clone()),
            fallback: FallbackChain::new(config.fallback_order.clone()),
        }
    }
}

impl<S: RuleSource + CandidateSource> Classifier<S> {
    /// Suggest an assignment for one transaction.
    ///
    /// `account_from_id`/`account_to_id` are `None` when the transaction has
    /// no account on that side; matchers on an absent account are skipped.
    pub fn classify(
        &self,
        user_id: UserId,
        description: &str,
        amount: Decimal,
        transaction_type: TransactionType,
        account_from_id: Option<AccountId>,
        account_to_id: Option<AccountId>,
    ) -> StoreResult<ClassificationResult> {
        let candidate = TransactionCandidate {
            description: description.to_string(),
            amount,
            transaction_type,
            account_from_id,
            account_to_id,
        };
        self.classify_candidate(user_id, &candidate)
    }

    /// Suggest an assignment for one transaction.
    ///
    /// Candidate names are only loaded when the fallback is reached, and only
    /// for the strategies actually tried.
    pub fn classify_candidate(
        &self,
        user_id: UserId,
        candidate: &TransactionCandidate,
    ) -> StoreResult<ClassificationResult> {
        let rules = self.store.rules_for_user(user_id)?;
        if let Some(winner) = self.ranker.best_match(&rules, candidate) {
            return Ok(ClassificationResult::from_rule(winner.rule));
        }

        if normalize(&candidate.description).is_empty() {
            debug!(user_id, "description has no matchable text, skipping fallback");
            return Ok(ClassificationResult::unmatched());
        }

        self.fallback.run(|kind| {
            let names = match kind {
                FallbackKind::Entity => self.store.entity_candidates(user_id)?,
                FallbackKind::Category => self.store.category_candidates(user_id)?,
            };
            Ok::<_, StoreError>(self.fuzzy.guess(&candidate.description, &names))
        })
    }

    /// Load everything a user's classifications need, once.
    pub fn snapshot(&self, user_id: UserId) -> StoreResult<ClassifierSnapshot<'_>> {
        let rules = self.store.rules_for_user(user_id)?;
        let mut entities = CandidateSet::default();
        let mut categories = CandidateSet::default();
        for kind in self.fallback.order() {
            match kind {
                FallbackKind::Entity => {
                    entities = CandidateSet::new(self.store.entity_candidates(user_id)?);
                }
                FallbackKind::Category => {
                    categories = CandidateSet::new(self.store.category_candidates(user_id)?);
                }
            }
        }

        debug!(
            user_id,
            rules = rules.len(),
            entities = entities.len(),
            categories = categories.len(),
            threshold = self.fuzzy.threshold(),
            "snapshot loaded"
        );

        Ok(ClassifierSnapshot {
            user_id,
            rules,
            entities,
            categories,
            ranker: &self.ranker,
            fuzzy: &self.fuzzy,
            fallback: &self.fallback,
        })
    }

    /// Classify many transactions for one user. Results are returned in
    /// input order.
    pub fn classify_batch(
        &self,
        user_id: UserId,
        candidates: &[TransactionCandidate],
    ) -> StoreResult<Vec<ClassificationResult>> {
        let snapshot = self.snapshot(user_id)?;
        let results = snapshot.classify_all(candidates);

        let matched = results.iter().filter(|r| !r.is_unmatched()).count();
        info!(user_id, total = results.len(), matched, "batch classified");
        Ok(results)
    }
}

/// A user's rules and candidate names, loaded once for repeated
/// classification. Classification against a snapshot never touches the store.
#[derive(Debug)]
pub struct ClassifierSnapshot<'c> {
    user_id: UserId,
    rules: Vec<Rule>,
    entities: CandidateSet,
    categories: CandidateSet,
    ranker: &'c RuleRanker,
    fuzzy: &'c FuzzyMatcher,
    fallback: &'c FallbackChain,
}

impl ClassifierSnapshot<'_> {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, candidate: &TransactionCandidate) -> ClassificationResult {
        if let Some(winner) = self.ranker.best_match(&self.rules, candidate) {
            return ClassificationResult::from_rule(winner.rule);
        }

        self.fallback
            .run(|kind| {
                let set = match kind {
                    FallbackKind::Entity => &self.entities,
                    FallbackKind::Category => &self.categories,
                };
                let guess = self.fuzzy.guess_in(&candidate.description, set);
                Ok::<_, std::convert::Infallible>(guess)
            })
            .unwrap_or_else(|never| match never {})
    }

    #[cfg(feature = "parallel")]
    fn classify_all(&self, candidates: &[TransactionCandidate]) -> Vec<ClassificationResult> {
        candidates.par_iter().map(|c| self.classify(c)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn classify_all(&self, candidates: &[TransactionCandidate]) -> Vec<ClassificationResult> {
        candidates.iter().map(|c| self.classify(c)).collect()
    }
}
