//! Tag normalization: coerce raw classifier output into a well-typed [`TagSet`].
//!
//! The classifier is an external language model and its output is untrusted;
//! normalization never fails. Non-mapping input collapses to the zero-value
//! tag set.

use serde_json::Value;

use yammy_types::{MealMode, TagSet};

use crate::patterns::{QUERY_SYNONYMS, SINGLE_CHAR_INGREDIENTS};

/// Coerce a raw classifier value into a [`TagSet`].
///
/// - Non-object input → zero-value tag set.
/// - `category`: a non-empty string becomes a one-element list; a list is
///   filtered to non-empty trimmed strings.
/// - `ingredients`: tokens pass the script/length filters of
///   [`clean_ingredient_tokens`].
/// - `mode`: `"fridge"` selects the pantry path, anything else is default.
#[must_use]
pub fn normalize_tags(raw: &Value) -> TagSet {
    let Value::Object(map) = raw else {
        return TagSet::default();
    };

    let category = match map.get("category") {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let raw_ingredients: Vec<String> = match map.get("ingredients") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    };

    let mode = match map.get("mode").and_then(Value::as_str) {
        Some("fridge") => MealMode::Fridge,
        _ => MealMode::Default,
    };

    TagSet {
        category,
        ingredients: clean_ingredient_tokens(&raw_ingredients),
        mode,
    }
}

/// Characters an ingredient token may carry: Hangul syllables and
/// compatibility jamo, ASCII digits, and space.
fn is_allowed_char(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{3131}'..='\u{318E}') || c.is_ascii_digit() || c == ' '
}

/// Clean raw ingredient tokens into the normalized keyword list.
///
/// Strips disallowed characters, splits on whitespace, drops purely numeric
/// tokens, drops single-character tokens outside the explicit allow-list,
/// and dedupes preserving first occurrence. Idempotent on already-clean input.
#[must_use]
pub fn clean_ingredient_tokens(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in raw {
        let stripped: String = token.chars().filter(|c| is_allowed_char(*c)).collect();
        for word in stripped.split_whitespace() {
            if word.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if word.chars().count() == 1 && !SINGLE_CHAR_INGREDIENTS.contains(&word) {
                continue;
            }
            if !out.iter().any(|seen| seen == word) {
                out.push(word.to_string());
            }
        }
    }
    out
}

/// Apply the fixed synonym substitutions to the raw query text.
///
/// Substitutions are literal, ordered `replace` calls; they only bias the
/// embedding text and never touch the tag set.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    QUERY_SYNONYMS
        .iter()
        .fold(query.to_string(), |q, (from, to)| q.replace(from, to))
}
