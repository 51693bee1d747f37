//! Composite embedding-query construction (semantic boosting).
//!
//! The embedded text is the user's normalized query plus a per-category
//! expansion phrase plus the ingredient tokens repeated with extra weight,
//! biasing the embedding direction toward the requested ingredients.

use yammy_tags::patterns::{CATEGORY_BOOST_PHRASES, DEFAULT_QUERY_BOOST};
use yammy_types::TagSet;

/// Extra repetitions of the ingredient tokens in the composite query.
pub const INGREDIENT_BOOST_REPEAT: usize = 3;

/// Expansion phrase for a category label, if one is curated.
#[must_use]
pub fn category_boost_phrase(category: &str) -> Option<&'static str> {
    CATEGORY_BOOST_PHRASES
        .iter()
        .find(|(label, _)| *label == category)
        .map(|(_, phrase)| *phrase)
}

/// Build the composite text handed to the embedding oracle.
#[must_use]
pub fn build_query_text(query: &str, tags: &TagSet) -> String {
    let mut parts: Vec<String> = vec![query.to_string()];

    if let Some(phrase) = tags.primary_category().and_then(category_boost_phrase) {
        parts.push(phrase.to_string());
    }

    if !tags.ingredients.is_empty() {
        let ing_text = tags.ingredients.join(" ");
        parts.push(ing_text.clone());
        parts.push(format!("{ing_text} ").repeat(INGREDIENT_BOOST_REPEAT));
    }

    let text = parts.join(" ").trim().to_string();
    if text.is_empty() {
        DEFAULT_QUERY_BOOST.to_string()
    } else {
        text
    }
}
