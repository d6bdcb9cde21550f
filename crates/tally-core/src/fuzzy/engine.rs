//! FuzzyMatcher - best-candidate selection over entity/category names

use serde::{Deserialize, Serialize};

use super::normalize::normalize;
use super::similarity::token_set_ratio;

/// An entity or category name eligible for suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyCandidate {
    pub id: i64,
    pub name: String,
}

impl FuzzyCandidate {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A candidate that cleared the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyGuess {
    pub id: i64,
    /// Display name of the matched candidate
    pub matched_name: String,
    /// Token-set similarity, 0-100
    pub score: f64,
}

/// Fuzzy fallback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Minimum similarity (0-100) a candidate needs to be suggested
    pub threshold: f64,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self { threshold: 80.0 }
    }
}

impl FuzzyConfig {
    /// A usable threshold lies in `(0, 100]`; at 0 every candidate would pass
    pub fn is_valid_threshold(threshold: f64) -> bool {
        threshold > 0.0 && threshold <= 100.0
    }
}

#[derive(Debug, Clone)]
struct PreparedCandidate {
    candidate: FuzzyCandidate,
    normalized: String,
    normalized_len: usize,
}

/// Candidates with their names normalized once.
///
/// Names that normalize to nothing are dropped.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    entries: Vec<PreparedCandidate>,
}

impl CandidateSet {
    pub fn new(candidates: impl IntoIterator<Item = FuzzyCandidate>) -> Self {
        let entries = candidates
            .into_iter()
            .filter_map(|candidate| {
                let normalized = normalize(&candidate.name);
                if normalized.is_empty() {
                    return None;
                }
                let normalized_len = normalized.chars().count();
                Some(PreparedCandidate {
                    candidate,
                    normalized,
                    normalized_len,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Approximate name matcher used when no rule matched
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: FuzzyConfig,
}

impl FuzzyMatcher {
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Guess the best candidate for `description` using the configured threshold
    pub fn guess(&self, description: &str, candidates: &[FuzzyCandidate]) -> Option<FuzzyGuess> {
        self.guess_in(description, &CandidateSet::new(candidates.iter().cloned()))
    }

    /// Guess against a prepared candidate set using the configured threshold
    pub fn guess_in(&self, description: &str, candidates: &CandidateSet) -> Option<FuzzyGuess> {
        guess_with_threshold(description, candidates, self.config.threshold)
    }
}

/// Highest-scoring candidate at or above `threshold`.
///
/// Equal scores prefer the longer normalized name. Returns `None` when the
/// description normalizes to nothing.
pub fn guess_with_threshold(
    description: &str,
    candidates: &CandidateSet,
    threshold: f64,
) -> Option<FuzzyGuess> {
    let haystack = normalize(description);
    if haystack.is_empty() {
        return None;
    }

    let mut best: Option<(&PreparedCandidate, f64)> = None;
    for entry in &candidates.entries {
        let score = token_set_ratio(&haystack, &entry.normalized);
        if score < threshold {
            continue;
        }
        let better = match best {
            None => true,
            Some((current, current_score)) => {
                score > current_score
                    || (score == current_score && entry.normalized_len > current.normalized_len)
            }
        };
        if better {
            best = Some((entry, score));
        }
    }

    best.map(|(entry, score)| FuzzyGuess {
        id: entry.candidate.id,
        matched_name: entry.candidate.name.clone(),
        score,
    })
}
