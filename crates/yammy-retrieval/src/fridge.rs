//! Pantry-mode retrieval: explicit ingredient matching, no embeddings.
//!
//! Each requested ingredient expands through the curated synonym table to
//! its surface-form variants; items score by how many requested ingredients
//! matched at all. One Aho-Corasick pass per item covers every variant.

use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use rand::Rng;
use rand::seq::SliceRandom;

use yammy_tags::patterns::{NOODLE_FAMILY, NOODLE_REQUEST_TOKENS, fridge_variants};

use crate::catalog::Catalog;
use crate::search::ScoredCandidate;

/// Score unseen catalog items against a pantry ingredient list.
///
/// - Score = number of requested ingredients with any variant present in
///   the item's ingredient text; zero-score items are excluded.
/// - Items whose text matches a noodle-family variant are excluded unless
///   the request explicitly names a noodle-type ingredient.
/// - Already-seen items are skipped up front and never restored.
/// - An empty ingredient list yields no candidates.
#[must_use]
pub fn fridge_candidates(
    catalog: &Catalog,
    ingredients: &[String],
    seen: &HashSet<i64>,
) -> Vec<ScoredCandidate> {
    if ingredients.is_empty() {
        return Vec::new();
    }

    // One pattern per variant, mapped back to the requested-ingredient
    // slot; the noodle family gets a sentinel slot past the last index.
    let noodle_slot = ingredients.len();
    let mut patterns: Vec<&str> = Vec::new();
    let mut slots: Vec<usize> = Vec::new();
    for (slot, ingredient) in ingredients.iter().enumerate() {
        for variant in fridge_variants(ingredient) {
            patterns.push(variant);
            slots.push(slot);
        }
    }
    for variant in fridge_variants(NOODLE_FAMILY) {
        patterns.push(variant);
        slots.push(noodle_slot);
    }
    let Ok(ac) = AhoCorasick::new(&patterns) else {
        return Vec::new();
    };

    let request_names_noodles = ingredients
        .iter()
        .any(|ing| NOODLE_REQUEST_TOKENS.contains(&ing.as_str()));

    let mut scored = Vec::new();
    for recipe in &catalog.recipes {
        if seen.contains(&recipe.recipe_id) {
            continue;
        }
        let text = recipe.ingredient_text();
        let mut matched_slots: HashSet<usize> = HashSet::new();
        for mat in ac.find_overlapping_iter(&text) {
            matched_slots.insert(slots[mat.pattern().as_usize()]);
        }
        let match_count = matched_slots
            .iter()
            .filter(|slot| **slot < noodle_slot)
            .count();
        if match_count == 0 {
            continue;
        }
        if matched_slots.contains(&noodle_slot) && !request_names_noodles {
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let score = match_count as f32;
        scored.push(ScoredCandidate {
            recipe_id: recipe.recipe_id,
            score,
        });
    }

    tracing::debug!(
        event = "retrieval.fridge.scored",
        requested = ingredients.len(),
        matched_items = scored.len(),
        "pantry ingredients scored against catalog"
    );
    scored
}

/// Pick among the top-scoring fridge candidates, breaking ties uniformly.
pub fn pick_fridge<R: Rng>(candidates: &[ScoredCandidate], rng: &mut R) -> Option<i64> {
    let best = candidates
        .iter()
        .map(|c| c.score)
        .fold(f32::NEG_INFINITY, f32::max);
    let top: Vec<i64> = candidates
        .iter()
        .filter(|c| c.score == best)
        .map(|c| c.recipe_id)
        .collect();
    top.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use yammy_types::Recipe;

    fn entry(recipe_id: i64, name: &str, ingredient: &str) -> CatalogEntry {
        CatalogEntry {
            recipe: Recipe {
                recipe_id,
                name: name.to_string(),
                serving: None,
                time: None,
                ingredient: ingredient.to_string(),
                spicy_ingredient: None,
                method: None,
                categories: Vec::new(),
            },
            vector: vec![0.0, 0.0],
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_entries(vec![
            entry(1, "계란볶음밥", "계란 쌀 대파"),
            entry(2, "제육볶음", "돼지고기 양파 고추장"),
            entry(3, "잔치국수", "국수 달걀 대파"),
            entry(4, "오이무침", "오이 식초 깨"),
        ])
        .unwrap()
    }

    fn ingredients(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_ingredient_list_yields_nothing() {
        let catalog = sample_catalog();
        assert!(fridge_candidates(&catalog, &[], &HashSet::new()).is_empty());
    }

    #[test]
    fn variants_count_toward_the_requested_ingredient() {
        let catalog = sample_catalog();
        // 달걀 matches item 1 via the 계란 variant; 밥 matches via 쌀.
        let out = fridge_candidates(&catalog, &ingredients(&["달걀", "밥"]), &HashSet::new());
        let top: Vec<(i64, f32)> = out.iter().map(|c| (c.recipe_id, c.score)).collect();
        assert!(top.contains(&(1, 2.0)));
    }

    #[test]
    fn zero_score_items_are_excluded() {
        let catalog = sample_catalog();
        let out = fridge_candidates(&catalog, &ingredients(&["고기"]), &HashSet::new());
        let ids: Vec<i64> = out.iter().map(|c| c.recipe_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn no_variant_anywhere_means_no_result() {
        let catalog = sample_catalog();
        let out = fridge_candidates(&catalog, &ingredients(&["전복", "송이버섯"]), &HashSet::new());
        assert!(out.is_empty());
    }

    #[test]
    fn noodle_items_need_an_explicit_noodle_request() {
        let catalog = sample_catalog();
        // 잔치국수 contains 달걀 but is a noodle dish; a non-noodle request
        // must not surface it.
        let out = fridge_candidates(&catalog, &ingredients(&["달걀"]), &HashSet::new());
        let ids: Vec<i64> = out.iter().map(|c| c.recipe_id).collect();
        assert_eq!(ids, vec![1]);

        let out = fridge_candidates(&catalog, &ingredients(&["달걀", "면"]), &HashSet::new());
        let ids: Vec<i64> = out.iter().map(|c| c.recipe_id).collect();
        assert!(ids.contains(&3));
    }

    #[test]
    fn seen_items_are_skipped_and_not_restored() {
        let catalog = sample_catalog();
        let seen: HashSet<i64> = [2].into_iter().collect();
        let out = fridge_candidates(&catalog, &ingredients(&["고기"]), &seen);
        assert!(out.is_empty());
    }

    #[test]
    fn pick_prefers_highest_score() {
        let candidates = vec![
            ScoredCandidate {
                recipe_id: 1,
                score: 2.0,
            },
            ScoredCandidate {
                recipe_id: 2,
                score: 1.0,
            },
        ];
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_fridge(&candidates, &mut rng), Some(1));
    }

    #[test]
    fn pick_breaks_ties_uniformly() {
        let candidates = vec![
            ScoredCandidate {
                recipe_id: 1,
                score: 2.0,
            },
            ScoredCandidate {
                recipe_id: 2,
                score: 2.0,
            },
        ];
        let mut seen_ids = HashSet::new();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(id) = pick_fridge(&candidates, &mut rng) {
                seen_ids.insert(id);
            }
        }
        assert_eq!(seen_ids, [1, 2].into_iter().collect());
    }

    #[test]
    fn pick_on_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_fridge(&[], &mut rng), None);
    }
}
