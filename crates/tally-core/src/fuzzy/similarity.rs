//! Token-set similarity
//!
//! Order-insensitive comparison on whitespace tokens. The shared tokens are
//! compared against each side's full token set, so a haystack that contains
//! the needle's tokens plus unrelated noise still scores 100.
//!
//! Scores are in `0.0..=100.0`. The underlying string ratio is the normalized
//! Levenshtein similarity scaled to 100.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Token-set similarity of two (already normalized) strings
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side is a subset of the other
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let combined_ab = join_nonempty(&sect, &diff_ab.join(" "));
    let combined_ba = join_nonempty(&sect, &diff_ba.join(" "));

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_ab))
            .max(ratio(&sect, &combined_ba));
    }
    best
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Normalized edit similarity in `0.0..=100.0`
pub fn ratio(a: &str, b: &str) -> f64 {
    100.0 * normalized_levenshtein(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_tokens_are_tolerated() {
        assert_eq!(token_set_ratio("COMPRA LIDL VAGOS", "LIDL"), 100.0);
        assert_eq!(token_set_ratio("LIDL", "COMPRA LIDL VAGOS"), 100.0);
    }

    #[test]
    fn order_insensitive() {
        assert_eq!(
            token_set_ratio("PINGO DOCE", "DOCE PINGO"),
            token_set_ratio("PINGO DOCE", "PINGO DOCE")
        );
    }

    #[test]
    fn unrelated_text_scores_low() {
        assert!(token_set_ratio("COMPRA CONTINENTE", "LIDL") < 50.0);
    }

    #[test]
    fn near_miss_scores_between() {
        // no shared token, one char different
        let score = token_set_ratio("LIDLL", "LIDL");
        assert!(score > 75.0 && score < 100.0, "score={score}");
    }

    #[test]
    fn partial_overlap_with_disjoint_remainders() {
        // sect = "PINGO", compares against "PINGO DOCE" and "PINGO DOLCE"
        let score = token_set_ratio("PINGO DOCE", "PINGO DOLCE");
        assert!(score > 60.0 && score < 100.0, "score={score}");
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(token_set_ratio("", "LIDL"), 0.0);
        assert_eq!(token_set_ratio("LIDL", "   "), 0.0);
    }

    #[test]
    fn ratio_basics() {
        assert_eq!(ratio("abc", "abc"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        // one deletion over four chars
        assert!((ratio("abcd", "abd") - 75.0).abs() < 1e-9);
    }
}
