//! Tolerant JSON extraction from LLM output.
//!
//! Language models wrap JSON in prose, code fences, or trailing commas.
//! These helpers cut the bracket window out of the reply and repair the
//! common damage; they return `None` instead of erroring, so callers can
//! fall back to their input.

use std::sync::OnceLock;

use regex::Regex;

// The two patterns are literals; a parse failure is a programmer error.
#[allow(clippy::unwrap_used)]
fn array_window() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[\s\S]*\]").unwrap())
}

#[allow(clippy::unwrap_used)]
fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*\]").unwrap())
}

/// Extract a JSON string array from free text.
///
/// Takes the outermost `[...]` window, strips trailing commas, and keeps
/// non-empty trimmed elements (non-string elements are stringified).
#[must_use]
pub fn extract_json_array(text: &str) -> Option<Vec<String>> {
    if text.is_empty() {
        return None;
    }
    let window = array_window().find(text)?.as_str();
    let repaired = trailing_comma().replace_all(window, "]");
    let value: serde_json::Value = serde_json::from_str(&repaired).ok()?;
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Extract the outermost `{...}` window and parse it.
///
/// Returns the parsed value, or `None` when no parsable object exists.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_is_cut_from_prose() {
        let out = extract_json_array("물론이죠! [\"달걀\", \"대파\"] 입니다.");
        assert_eq!(out, Some(vec!["달걀".to_string(), "대파".to_string()]));
    }

    #[test]
    fn trailing_comma_is_repaired() {
        let out = extract_json_array("[\"달걀\", \"대파\", ]");
        assert_eq!(out, Some(vec!["달걀".to_string(), "대파".to_string()]));
    }

    #[test]
    fn empty_and_bracketless_text_yield_none() {
        assert_eq!(extract_json_array(""), None);
        assert_eq!(extract_json_array("재료가 없습니다"), None);
    }

    #[test]
    fn non_string_elements_are_stringified() {
        let out = extract_json_array("[1, \"달걀\"]");
        assert_eq!(out, Some(vec!["1".to_string(), "달걀".to_string()]));
    }

    #[test]
    fn object_window_is_extracted() {
        let out = extract_json_object("결과: {\"category\": [\"찌개\"], \"ingredients\": []} 끝");
        assert_eq!(out, Some(json!({"category": ["찌개"], "ingredients": []})));
    }

    #[test]
    fn unparsable_object_yields_none() {
        assert_eq!(extract_json_object("{broken"), None);
        assert_eq!(extract_json_object("no braces"), None);
    }
}
