//! Shared fixtures for pipeline tests: a small catalog, a deterministic
//! embedder, and stub external collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use yammy_retrieval::{Catalog, CatalogEntry, Embedder, HashedEmbedder};
use yammy_types::Recipe;

use crate::llm::{AnswerWriter, IntentClassifier};

/// Embedding dimension shared by the fixture catalog and [`test_embedder`].
pub const TEST_DIMENSION: usize = 32;

/// Deterministic embedder matching the fixture catalog's dimension.
#[must_use]
pub fn test_embedder() -> HashedEmbedder {
    HashedEmbedder::new(TEST_DIMENSION)
}

fn entry(
    recipe_id: i64,
    name: &str,
    ingredient: &str,
    spicy: Option<&str>,
    categories: &[&str],
) -> CatalogEntry {
    let recipe = Recipe {
        recipe_id,
        name: name.to_string(),
        serving: Some("2인분".to_string()),
        time: Some("30분".to_string()),
        ingredient: ingredient.to_string(),
        spicy_ingredient: spicy.map(str::to_string),
        method: None,
        categories: categories.iter().map(|s| (*s).to_string()).collect(),
    };
    let vector = test_embedder().encode(&format!("{name} {ingredient}"));
    CatalogEntry { recipe, vector }
}

/// Catalog entries covering stews, soups, noodles, rice, and side dishes.
#[must_use]
pub fn sample_entries() -> Vec<CatalogEntry> {
    vec![
        entry(
            1,
            "김치찌개",
            "김치 돼지고기 두부 대파 육수",
            Some("고춧가루 청양고추"),
            &["찌개"],
        ),
        entry(2, "된장찌개", "된장 두부 애호박 감자 육수", None, &["찌개"]),
        entry(
            3,
            "순두부찌개",
            "순두부 바지락 달걀 육수",
            Some("고춧가루 청양고추"),
            &["찌개"],
        ),
        entry(4, "미역국", "미역 소고기 국간장 마늘 육수", None, &["국-탕"]),
        entry(5, "잔치국수", "국수 달걀 대파 애호박 육수", None, &["면-만두"]),
        entry(6, "계란볶음밥", "계란 쌀 대파 당근", None, &["밥-떡"]),
        entry(
            7,
            "제육볶음",
            "돼지고기 양파 대파 마늘",
            Some("고추장 고춧가루"),
            &["메인반찬"],
        ),
        entry(8, "오이무침", "오이 식초 깨 설탕", None, &["밑반찬"]),
    ]
}

/// Fixture catalog built from [`sample_entries`].
///
/// # Panics
///
/// Panics when the fixture entries are inconsistent (never in practice).
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn sample_catalog() -> Catalog {
    Catalog::from_entries(sample_entries()).unwrap()
}

/// Classifier stub returning one fixed raw value.
pub struct FixedClassifier {
    value: serde_json::Value,
}

impl FixedClassifier {
    /// Wrap a fixed classifier reply.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl IntentClassifier for FixedClassifier {
    async fn analyze(&self, _query: &str) -> Result<serde_json::Value> {
        Ok(self.value.clone())
    }
}

/// Classifier stub replaying a queue of raw values, then nulls.
pub struct SequenceClassifier {
    values: Mutex<VecDeque<serde_json::Value>>,
}

impl SequenceClassifier {
    /// Queue classifier replies in order.
    #[must_use]
    pub fn new(values: Vec<serde_json::Value>) -> Self {
        Self {
            values: Mutex::new(values.into()),
        }
    }
}

#[async_trait]
impl IntentClassifier for SequenceClassifier {
    async fn analyze(&self, _query: &str) -> Result<serde_json::Value> {
        let mut queue = self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(queue.pop_front().unwrap_or(serde_json::Value::Null))
    }
}

/// Answer writer stub echoing the recipe name.
pub struct EchoWriter;

#[async_trait]
impl AnswerWriter for EchoWriter {
    async fn respond(
        &self,
        _query: &str,
        recipe: &Recipe,
        _prev: Option<&Recipe>,
    ) -> Result<String> {
        Ok(format!("오늘은 {} 어때요?", recipe.name))
    }
}

/// Embedder stub that always fails, for error-propagation tests.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(anyhow::anyhow!("embedding service offline"))
    }
}
