//! Keyword tables for tag rules, query normalization, and fridge matching.
//!
//! Centralized constants so rule order and vocabulary live in one place.
//! All matching over these tables is plain substring search.

/// Query keyword that forces the stew category.
pub const STEW_KEYWORD: &str = "찌개";
/// Query keywords implying a broth/soup dish.
pub const BROTH_KEYWORDS: [&str; 3] = ["국물", "국", "탕"];
/// Query keywords implying a noodle dish.
pub const NOODLE_KEYWORDS: [&str; 7] =
    ["라면", "면요리", "면 요리", "우동", "국수", "칼국수", "소면"];
/// Explicit fermented-vegetable dish keyword; overrides the broth rules.
pub const KIMCHI_KEYWORD: &str = "김치";
/// Query keywords signalling spice intensity.
pub const SPICY_KEYWORDS: [&str; 4] = ["칼칼", "얼큰", "맵게", "매콤"];
/// Canonical spicy ingredient tokens prepended for spice-intensity queries.
/// Prepended in reverse, so the final order is 청양고추, 고춧가루.
pub const SPICY_BOOST_INGREDIENTS: [&str; 2] = ["고춧가루", "청양고추"];
/// Canonical stock token appended for broth-implying queries.
pub const STOCK_INGREDIENT: &str = "육수";
/// Collapse priority when more than one category label survives.
pub const CATEGORY_PRIORITY: [&str; 5] = ["찌개", "국-탕", "면-만두", "메인반찬", "밑반찬"];

/// Follow-up utterance markers ("not that", "different", "more", ...).
pub const FOLLOW_UP_KEYWORDS: [&str; 6] = ["말고", "다른", "딴거", "또", "더", "별로"];

/// Single-character ingredient tokens that survive the length filter.
pub const SINGLE_CHAR_INGREDIENTS: [&str; 6] = ["파", "밥", "면", "김", "굴", "깨"];

/// Ordered literal query substitutions applied before embedding.
pub const QUERY_SYNONYMS: [(&str, &str); 4] = [
    ("계란", "달걀"),
    ("에그", "달걀"),
    ("파", "대파"),
    ("고추", "청양고추"),
];

/// Per-category semantic-expansion phrases appended to the embedding query.
pub const CATEGORY_BOOST_PHRASES: [(&str, &str); 11] = [
    ("밑반찬", "간단한 반찬 간단요리 무침 볶음 조림 짭짤한 집반찬"),
    ("메인반찬", "메인요리 고기 해물 든든한 구이 튀김 볶음 메인 디너"),
    ("국-탕", "국물 따뜻한 시원한 탕 깊은육수 한식국물 얼큰 개운한"),
    ("찌개", "찌개 얼큰 자작 국물 진한 맛 칼칼한 구수한 깊은맛 한식찌개"),
    ("면-만두", "면요리 라면 칼국수 국수 우동 만두 쫄깃한 면식"),
    ("밥-떡", "밥 한식 백반 든든한 집밥 따뜻한 공기밥 떡 기본식사"),
    ("김치", "김치 배추김치 깍두기 아삭한 새콤한 발효 김장 매콤한"),
    ("양식", "양식 버터 치즈 오븐 스테이크 수프 샐러드 서양식 요리"),
    ("샐러드", "샐러드 상큼 야채 건강식 가벼운 식사 드레싱 채소 신선한"),
    ("빵", "빵 토스트 샌드위치 베이커리 브런치 간단식 밀가루 버터 오븐"),
    ("기타", "기타 요리 독특한 음식 단일메뉴 특별한요리"),
];

/// Fallback embedding query when the composite text is blank.
pub const DEFAULT_QUERY_BOOST: &str = "요리 음식 레시피 한식 집밥";

/// Surface-form variants per pantry ingredient family.
/// An ingredient absent from this table matches only itself.
pub const FRIDGE_SYNONYMS: [(&str, &[&str]); 8] = [
    ("고기", &["고기", "돼지고기", "소고기", "쇠고기", "닭", "닭고기"]),
    ("달걀", &["달걀", "계란"]),
    ("계란", &["달걀", "계란"]),
    ("파", &["파", "대파", "쪽파"]),
    ("고추", &["고추", "청양고추", "홍고추"]),
    ("면", &["면", "국수", "라면", "파스타", "짜파게티"]),
    ("밥", &["밥", "쌀"]),
    ("해산물", &["새우", "오징어", "조개", "게"]),
];

/// Request tokens that explicitly name a noodle dish; without one, fridge
/// mode excludes noodle items entirely.
pub const NOODLE_REQUEST_TOKENS: [&str; 3] = ["면", "라면", "파스타"];

/// Noodle family key in [`FRIDGE_SYNONYMS`].
pub const NOODLE_FAMILY: &str = "면";

/// Surface-form variants for a pantry ingredient; the ingredient itself
/// when it has no curated family.
#[must_use]
pub fn fridge_variants<'a>(ingredient: &'a str) -> Vec<&'a str> {
    FRIDGE_SYNONYMS
        .iter()
        .find(|(key, _)| *key == ingredient)
        .map_or_else(|| vec![ingredient], |(_, variants)| variants.to_vec())
}

/// Whether the query contains any of the given keywords (literal substring).
#[must_use]
pub fn contains_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query.contains(k))
}
