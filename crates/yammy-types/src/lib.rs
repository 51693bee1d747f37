//! yammy-types - Common type definitions for the Yammy recommendation core
//!
//! This crate provides shared data structures used across all Yammy crates.
//!
//! # Schema Singularity
//! Wire-facing types derive `schemars::JsonSchema` so the authoritative tag
//! schema can be generated from Rust and embedded in the classifier prompt,
//! instead of being duplicated by hand.

#![allow(clippy::doc_markdown)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed category vocabulary, matching the catalog's label set.
///
/// The classifier is instructed to pick from this list; anything outside it
/// is dropped during rule adjustment.
pub const CATEGORY_VOCABULARY: [&str; 11] = [
    "밑반찬",
    "메인반찬",
    "국-탕",
    "찌개",
    "면-만두",
    "밥-떡",
    "김치",
    "양식",
    "샐러드",
    "빵",
    "기타",
];

/// Retrieval mode carried inside a [`TagSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MealMode {
    /// Standard flow: free-text query ranked by embedding similarity.
    #[default]
    Default,
    /// Pantry flow: explicit ingredient matching, no embeddings.
    Fridge,
}

/// Normalized structured intent: category + ingredient keywords + mode.
///
/// Produced once at the normalization boundary; every downstream stage may
/// assume well-typed input. Invariant after rule adjustment: `category`
/// holds at most one label, drawn from [`CATEGORY_VOCABULARY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagSet {
    /// Category labels (at most one after adjustment).
    #[serde(default)]
    pub category: Vec<String>,
    /// Deduplicated, order-preserving ingredient keywords.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Which retrieval path this request takes.
    #[serde(default)]
    pub mode: MealMode,
}

impl TagSet {
    /// First (and only, post-adjustment) category label, if any.
    #[must_use]
    pub fn primary_category(&self) -> Option<&str> {
        self.category.first().map(String::as_str)
    }

    /// A "strong" request names at least two ingredients; the selector
    /// answers it deterministically instead of sampling.
    #[must_use]
    pub fn is_strong(&self) -> bool {
        self.ingredients.len() >= 2
    }

    /// Whether this request takes the pantry path.
    #[must_use]
    pub fn is_fridge(&self) -> bool {
        self.mode == MealMode::Fridge
    }
}

/// One catalog item. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recipe {
    /// Catalog-wide unique id.
    pub recipe_id: i64,
    /// Display name.
    pub name: String,
    /// Serving size, free text.
    #[serde(default)]
    pub serving: Option<String>,
    /// Preparation time, free text.
    #[serde(default)]
    pub time: Option<String>,
    /// Main ingredient line, free text.
    pub ingredient: String,
    /// Spice-relevant ingredient line, free text.
    #[serde(default)]
    pub spicy_ingredient: Option<String>,
    /// Cooking method, free text.
    #[serde(default)]
    pub method: Option<String>,
    /// Category labels assigned to this item.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Recipe {
    /// Concatenated ingredient text used by the hard filter and the fridge
    /// matcher. Matching is literal substring search over this string.
    #[must_use]
    pub fn ingredient_text(&self) -> String {
        match self.spicy_ingredient.as_deref() {
            Some(spicy) if !spicy.is_empty() => format!("{} {}", self.ingredient, spicy),
            _ => self.ingredient.clone(),
        }
    }
}

/// Conversation-level reply: rendered answer + chosen item + final tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Natural-language answer shown to the user.
    pub answer: String,
    /// Chosen recipe, or `None` when nothing matched.
    pub recipe: Option<Recipe>,
    /// Tags after normalization, rule adjustment, and context inheritance.
    pub tags: TagSet,
}
