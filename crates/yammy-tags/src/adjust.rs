//! Deterministic rule adjustment of classifier tags against the raw query.
//!
//! The upstream classifier is probabilistic; these ordered substring rules
//! patch its output before retrieval. Later rules may override earlier ones.
//! All functions are pure and return new values.

use yammy_types::{CATEGORY_VOCABULARY, TagSet};

use crate::patterns::{
    BROTH_KEYWORDS, CATEGORY_PRIORITY, FOLLOW_UP_KEYWORDS, KIMCHI_KEYWORD, NOODLE_KEYWORDS,
    SPICY_BOOST_INGREDIENTS, SPICY_KEYWORDS, STEW_KEYWORD, STOCK_INGREDIENT, contains_any,
};

/// Apply the keyword rules to a normalized tag set.
///
/// Rule order:
/// 1. Stew keyword → category forced to stew.
/// 2. Else broth keywords → soup category unless stew already won.
/// 3. Noodle keywords fill an empty category.
/// 4. Explicit kimchi keyword overrides 1–3.
/// 5. Spice-intensity keywords prepend the canonical spicy tokens.
/// 6. Broth-implying keywords append the stock token.
/// 7. Multiple surviving labels collapse via the fixed priority order.
///
/// Labels outside [`CATEGORY_VOCABULARY`] are dropped before rule 1.
/// Output invariant: at most one category label.
#[must_use]
pub fn adjust_tags(tags: TagSet, query: &str) -> TagSet {
    let TagSet {
        category,
        mut ingredients,
        mode,
    } = tags;

    let mut category: Vec<String> = category
        .into_iter()
        .filter(|c| CATEGORY_VOCABULARY.contains(&c.as_str()))
        .collect();

    if query.contains(STEW_KEYWORD) {
        category = vec![STEW_KEYWORD.to_string()];
    } else if contains_any(query, &BROTH_KEYWORDS) && category != [STEW_KEYWORD] {
        category = vec!["국-탕".to_string()];
    }

    if contains_any(query, &NOODLE_KEYWORDS) && category.is_empty() {
        category = vec!["면-만두".to_string()];
    }

    if query.contains(KIMCHI_KEYWORD) {
        category = vec![KIMCHI_KEYWORD.to_string()];
    }

    if contains_any(query, &SPICY_KEYWORDS) {
        for token in SPICY_BOOST_INGREDIENTS {
            if !ingredients.iter().any(|i| i == token) {
                ingredients.insert(0, token.to_string());
            }
        }
    }

    if (contains_any(query, &BROTH_KEYWORDS) || query.contains(STEW_KEYWORD))
        && !ingredients.iter().any(|i| i == STOCK_INGREDIENT)
    {
        ingredients.push(STOCK_INGREDIENT.to_string());
    }

    if category.len() > 1 {
        category = match CATEGORY_PRIORITY
            .iter()
            .find(|p| category.iter().any(|c| c == *p))
        {
            Some(picked) => vec![(*picked).to_string()],
            None => category.into_iter().take(1).collect(),
        };
    }

    TagSet {
        category,
        ingredients,
        mode,
    }
}

/// Whether an utterance reads as a follow-up to the previous recommendation.
#[must_use]
pub fn is_follow_up(query: &str) -> bool {
    contains_any(query, &FOLLOW_UP_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_with(category: &[&str], ingredients: &[&str]) -> TagSet {
        TagSet {
            category: category.iter().map(|s| (*s).to_string()).collect(),
            ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
            mode: yammy_types::MealMode::Default,
        }
    }

    #[test]
    fn stew_keyword_forces_stew_category() {
        let out = adjust_tags(tags_with(&["면-만두"], &[]), "얼큰한 찌개 먹고 싶어");
        assert_eq!(out.category, ["찌개"]);
    }

    #[test]
    fn broth_keyword_sets_soup_unless_stew() {
        let out = adjust_tags(tags_with(&[], &[]), "따뜻한 국물 요리");
        assert_eq!(out.category, ["국-탕"]);

        // An already-won stew label is not demoted by broth keywords.
        let out = adjust_tags(tags_with(&["찌개"], &[]), "국물 많은 거");
        assert_eq!(out.category, ["찌개"]);
    }

    #[test]
    fn noodle_keyword_fills_empty_category_only() {
        let out = adjust_tags(tags_with(&[], &[]), "우동 먹을까");
        assert_eq!(out.category, ["면-만두"]);

        let out = adjust_tags(tags_with(&["양식"], &[]), "우동 먹을까");
        assert_eq!(out.category, ["양식"]);
    }

    #[test]
    fn kimchi_keyword_overrides_broth_rules() {
        let out = adjust_tags(tags_with(&[], &[]), "김치로 끓인 국");
        assert_eq!(out.category, ["김치"]);
    }

    #[test]
    fn spicy_keywords_prepend_canonical_tokens() {
        let out = adjust_tags(tags_with(&[], &["두부"]), "칼칼한 거");
        assert_eq!(out.ingredients, ["청양고추", "고춧가루", "두부"]);
    }

    #[test]
    fn spicy_tokens_not_duplicated() {
        let out = adjust_tags(tags_with(&[], &["고춧가루"]), "매콤하게");
        assert_eq!(out.ingredients, ["청양고추", "고춧가루"]);
    }

    #[test]
    fn broth_query_appends_stock_once() {
        let out = adjust_tags(tags_with(&[], &["육수"]), "탕 요리");
        assert_eq!(out.ingredients, ["육수"]);

        let out = adjust_tags(tags_with(&[], &["무"]), "시원한 국");
        assert_eq!(out.ingredients, ["무", "육수"]);
    }

    #[test]
    fn unknown_categories_are_dropped() {
        let out = adjust_tags(tags_with(&["중식", "디저트"], &[]), "아무거나");
        assert!(out.category.is_empty());
    }

    #[test]
    fn multiple_labels_collapse_by_priority() {
        let out = adjust_tags(tags_with(&["밑반찬", "국-탕"], &[]), "아무거나");
        assert_eq!(out.category, ["국-탕"]);
    }

    #[test]
    fn multiple_labels_without_priority_keep_first() {
        let out = adjust_tags(tags_with(&["양식", "샐러드"], &[]), "아무거나");
        assert_eq!(out.category, ["양식"]);
    }

    #[test]
    fn category_is_at_most_one_for_all_inputs() {
        let queries = ["찌개", "국물 김치 라면", "매콤한 우동", "아무거나", ""];
        let tag_sets = [
            tags_with(&[], &[]),
            tags_with(&["밑반찬", "메인반찬", "국-탕"], &["두부"]),
            tags_with(&["양식", "빵", "기타"], &[]),
        ];
        for query in queries {
            for tags in &tag_sets {
                let out = adjust_tags(tags.clone(), query);
                assert!(out.category.len() <= 1, "query={query}");
            }
        }
    }

    #[test]
    fn follow_up_detection() {
        assert!(is_follow_up("그거 말고 다른 거"));
        assert!(is_follow_up("좀 더 매운 거"));
        assert!(!is_follow_up("김치찌개 추천해줘"));
    }
}
