//! Collaborator interfaces consumed by the classifier

use crate::fuzzy::FuzzyCandidate;
use crate::rule::{Rule, UserId};
use crate::storage::error::StoreResult;

/// Source of a user's classification rules.
///
/// Order of the returned rules is unspecified; ranking does not depend on it.
pub trait RuleSource {
    fn rules_for_user(&self, user_id: UserId) -> StoreResult<Vec<Rule>>;
}

/// Source of entity and category names for the fuzzy fallback
pub trait CandidateSource {
    fn entity_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>>;

    fn category_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>>;
}

impl<T: RuleSource + ?Sized> RuleSource for &T {
    fn rules_for_user(&self, user_id: UserId) -> StoreResult<Vec<Rule>> {
        (**self).rules_for_user(user_id)
    }
}

impl<T: CandidateSource + ?Sized> CandidateSource for &T {
    fn entity_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>> {
        (**self).entity_candidates(user_id)
    }

    fn category_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>> {
        (**self).category_candidates(user_id)
    }
}
