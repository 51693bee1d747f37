//! Final selection: seen-exclusion plus exploit/explore decision.
//!
//! Strong requests (two or more ingredient tokens) are answered
//! deterministically with the top-ranked candidate; vague requests sample
//! from a softmax distribution over the scores so repeated asks rotate.
//! The random source is injected, keeping selection reproducible under test.

use std::collections::HashSet;

use rand::Rng;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;

use crate::search::ScoredCandidate;

/// Convert scores to a probability distribution.
///
/// Subtracts the maximum before exponentiating for numerical stability.
#[must_use]
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|e| e / sum).collect()
}

/// Pick one candidate id, or `None` when `candidates` is empty.
///
/// Seen ids are removed first; if that empties the list the original
/// candidates are restored; exclusion never turns a non-empty pool into
/// a no-result. `strong` requests take the top-ranked survivor; otherwise
/// one survivor is sampled with probability proportional to its
/// exponentiated score.
pub fn select_candidate<R: Rng>(
    candidates: &[ScoredCandidate],
    seen: &HashSet<i64>,
    strong: bool,
    rng: &mut R,
) -> Option<i64> {
    if candidates.is_empty() {
        return None;
    }

    let mut remaining: Vec<&ScoredCandidate> = candidates
        .iter()
        .filter(|c| !seen.contains(&c.recipe_id))
        .collect();
    if remaining.is_empty() {
        remaining = candidates.iter().collect();
        tracing::debug!(
            event = "selector.seen.exhausted",
            candidate_count = candidates.len(),
            "all candidates already seen; restoring full list"
        );
    }

    if strong {
        return remaining.first().map(|c| c.recipe_id);
    }

    let scores: Vec<f32> = remaining.iter().map(|c| c.score).collect();
    let probs = softmax(&scores);
    match WeightedIndex::new(&probs) {
        Ok(dist) => {
            let idx = dist.sample(rng);
            Some(remaining[idx].recipe_id)
        }
        // Degenerate weights cannot happen with softmax output, but never
        // drop a candidate pool on a sampling error.
        Err(_) => remaining.first().map(|c| c.recipe_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scored(pairs: &[(i64, f32)]) -> Vec<ScoredCandidate> {
        pairs
            .iter()
            .map(|(recipe_id, score)| ScoredCandidate {
                recipe_id: *recipe_id,
                score: *score,
            })
            .collect()
    }

    #[test]
    fn softmax_is_a_distribution() {
        let probs = softmax(&[0.9, 0.5, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let a = softmax(&[0.9, 0.5, 0.1]);
        let b = softmax(&[1000.9, 1000.5, 1000.1]);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_candidates_yield_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            select_candidate(&[], &HashSet::new(), false, &mut rng),
            None
        );
    }

    #[test]
    fn strong_request_takes_top_unseen() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = scored(&[(1, 0.9), (2, 0.8), (3, 0.7)]);
        let seen: HashSet<i64> = [1].into_iter().collect();
        assert_eq!(
            select_candidate(&candidates, &seen, true, &mut rng),
            Some(2)
        );
    }

    #[test]
    fn strong_request_with_everything_seen_takes_overall_top() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = scored(&[(1, 0.9), (2, 0.8)]);
        let seen: HashSet<i64> = [1, 2].into_iter().collect();
        assert_eq!(
            select_candidate(&candidates, &seen, true, &mut rng),
            Some(1)
        );
    }

    #[test]
    fn sampling_never_returns_a_seen_id_while_unseen_remain() {
        let candidates = scored(&[(1, 0.9), (2, 0.8), (3, 0.7)]);
        let seen: HashSet<i64> = [1].into_iter().collect();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select_candidate(&candidates, &seen, false, &mut rng);
            assert!(matches!(picked, Some(2 | 3)));
        }
    }

    #[test]
    fn sampling_is_reproducible_per_seed() {
        let candidates = scored(&[(1, 0.9), (2, 0.8), (3, 0.7)]);
        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            select_candidate(&candidates, &HashSet::new(), false, &mut rng)
        };
        assert_eq!(pick(7), pick(7));
    }

    #[test]
    fn sampling_eventually_visits_lower_ranked_candidates() {
        let candidates = scored(&[(1, 0.9), (2, 0.85)]);
        let mut picked_second = false;
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            if select_candidate(&candidates, &HashSet::new(), false, &mut rng) == Some(2) {
                picked_second = true;
                break;
            }
        }
        assert!(picked_second, "close scores should explore beyond rank 1");
    }
}
