//! Candidate retrieval: hard filter + embedding-similarity ranking.
//!
//! Stage A narrows the pool with literal category/ingredient matching;
//! Stage B ranks the survivors by cosine similarity against the embedded
//! composite query and returns the top K with scores.

use yammy_tags::normalize_query;
use yammy_types::TagSet;

use crate::catalog::Catalog;
use crate::embed::{Embedder, cosine_similarity};
use crate::error::RetrievalError;
use crate::query::build_query_text;

/// Maximum candidates returned by ranking.
pub const TOP_K: usize = 10;

/// One ranked candidate: id + similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    /// Catalog id of the candidate.
    pub recipe_id: i64,
    /// Ranking score (cosine similarity, or match count in fridge mode).
    pub score: f32,
}

/// Stage A: literal hard filter over the catalog.
///
/// Category matching accepts exact or substring containment in either
/// direction; ingredient matching requires every requested token as a
/// literal substring of the item's concatenated ingredient text (AND
/// semantics). An empty result falls back to the unfiltered catalog:
/// the filter never reduces the pool to nothing. With no category and no
/// ingredients this is a no-op.
///
/// Precision over recall: no item lacking a requested ingredient is ever
/// surfaced; the embedding stage restores recall for everything else.
#[must_use]
pub fn hard_filter(catalog: &Catalog, tags: &TagSet) -> Vec<usize> {
    let all = || (0..catalog.len()).collect::<Vec<_>>();
    if tags.category.is_empty() && tags.ingredients.is_empty() {
        return all();
    }

    let target = tags.primary_category();
    let mut survivors = Vec::new();
    for (idx, recipe) in catalog.recipes.iter().enumerate() {
        if let Some(target) = target {
            let matched = recipe
                .categories
                .iter()
                .any(|c| c.contains(target) || target.contains(c.as_str()));
            if !matched {
                continue;
            }
        }
        if !tags.ingredients.is_empty() {
            let text = recipe.ingredient_text();
            if !tags.ingredients.iter().all(|ing| text.contains(ing.as_str())) {
                continue;
            }
        }
        survivors.push(idx);
    }

    if survivors.is_empty() {
        tracing::debug!(
            event = "retrieval.filter.fallback",
            category = ?target,
            ingredient_count = tags.ingredients.len(),
            "hard filter emptied the pool; widening to full catalog"
        );
        return all();
    }
    survivors
}

/// Retrieve the top-K candidates for a query + tag set.
///
/// The query text passes the synonym normalizer, the hard filter narrows
/// the pool, and the composite query embedding ranks the survivors.
///
/// # Errors
///
/// Returns [`RetrievalError::Embedding`] when the oracle fails and
/// [`RetrievalError::QueryDimension`] when its vector does not match the
/// catalog's dimension.
pub async fn candidates(
    catalog: &Catalog,
    embedder: &dyn Embedder,
    query: &str,
    tags: &TagSet,
) -> Result<Vec<ScoredCandidate>, RetrievalError> {
    if catalog.is_empty() {
        return Ok(Vec::new());
    }

    let normalized = normalize_query(query);
    let pool = hard_filter(catalog, tags);
    let composite = build_query_text(&normalized, tags);

    let query_vec = embedder
        .embed(&composite)
        .await
        .map_err(RetrievalError::Embedding)?;
    if query_vec.len() != catalog.dimension() {
        return Err(RetrievalError::QueryDimension {
            expected: catalog.dimension(),
            actual: query_vec.len(),
        });
    }

    let mut scored: Vec<ScoredCandidate> = pool
        .iter()
        .map(|&idx| ScoredCandidate {
            recipe_id: catalog.recipes[idx].recipe_id,
            score: cosine_similarity(&query_vec, &catalog.vectors[idx]),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(TOP_K);

    tracing::debug!(
        event = "retrieval.candidates.ranked",
        pool_size = pool.len(),
        returned = scored.len(),
        "candidates ranked by similarity"
    );
    Ok(scored)
}
