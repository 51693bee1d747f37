//! Recommendation services: the core pipeline API plus the
//! conversation-level orchestrator.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use yammy_retrieval::{
    Catalog, Embedder, RetrievalError, candidates, fridge_candidates, pick_fridge,
    select_candidate,
};
use yammy_session::SeenStore;
use yammy_tags::{adjust_tags, clean_ingredient_tokens, normalize_tags};
use yammy_types::{ChatReply, MealMode, Recipe, TagSet};

use crate::context::inherit_context;
use crate::llm::{AnswerWriter, IntentClassifier, PantryMapper};
use crate::observability::PipelineEvent;

/// Fixed user-facing reply when the pipeline yields no recipe.
pub const NO_MATCH_ANSWER: &str = "조건에 맞는 요리를 찾지 못했어.";

/// Core pipeline: catalog + embedder + seeded selection RNG.
///
/// Holds no per-user state; the caller supplies the seen set, so requests
/// for different users may run concurrently.
pub struct RecommendService {
    catalog: Arc<Catalog>,
    embedder: Arc<dyn Embedder>,
    rng: Mutex<StdRng>,
}

impl RecommendService {
    /// Build the service. A fixed `seed` makes selection reproducible;
    /// otherwise the RNG is entropy-seeded.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, embedder: Arc<dyn Embedder>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            embedder,
            rng: Mutex::new(rng),
        }
    }

    /// The catalog snapshot this service answers from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Standard flow: one recipe for a query + tag set, excluding seen ids.
    ///
    /// Routes to the pantry flow when the tag set carries fridge mode.
    /// `None` means nothing matched, which is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError`] when the embedding oracle fails; no
    /// ranking is possible without vectors.
    pub async fn next_recipe(
        &self,
        query: &str,
        tags: &TagSet,
        seen: &HashSet<i64>,
    ) -> Result<Option<Recipe>, RetrievalError> {
        if tags.is_fridge() {
            return Ok(self.next_recipe_from_fridge(&tags.ingredients, seen).await);
        }

        let ranked = candidates(&self.catalog, self.embedder.as_ref(), query, tags).await?;
        let picked = {
            let mut rng = self.rng.lock().await;
            select_candidate(&ranked, seen, tags.is_strong(), &mut *rng)
        };
        match picked {
            Some(recipe_id) => {
                tracing::debug!(
                    event = PipelineEvent::RecipeSelected.as_str(),
                    recipe_id,
                    strong = tags.is_strong(),
                    "recipe selected"
                );
                Ok(self.catalog.get(recipe_id).cloned())
            }
            None => Ok(None),
        }
    }

    /// Pantry flow: one recipe matched purely on ingredient variants.
    pub async fn next_recipe_from_fridge(
        &self,
        ingredients: &[String],
        seen: &HashSet<i64>,
    ) -> Option<Recipe> {
        let scored = fridge_candidates(&self.catalog, ingredients, seen);
        let picked = {
            let mut rng = self.rng.lock().await;
            pick_fridge(&scored, &mut *rng)
        };
        picked.and_then(|recipe_id| {
            tracing::debug!(
                event = PipelineEvent::RecipeSelected.as_str(),
                recipe_id,
                mode = "fridge",
                "recipe selected"
            );
            self.catalog.get(recipe_id).cloned()
        })
    }
}

/// Conversation-level orchestrator: classifier → tag rules → pipeline →
/// session record → answer writer.
pub struct ChatService {
    recommender: Arc<RecommendService>,
    sessions: Arc<SeenStore>,
    classifier: Arc<dyn IntentClassifier>,
    writer: Arc<dyn AnswerWriter>,
    mapper: Option<Arc<dyn PantryMapper>>,
}

impl ChatService {
    /// Wire the orchestrator. `mapper` is optional; without it the pantry
    /// flow uses the caller's ingredient list as-is.
    #[must_use]
    pub fn new(
        recommender: Arc<RecommendService>,
        sessions: Arc<SeenStore>,
        classifier: Arc<dyn IntentClassifier>,
        writer: Arc<dyn AnswerWriter>,
        mapper: Option<Arc<dyn PantryMapper>>,
    ) -> Self {
        Self {
            recommender,
            sessions,
            classifier,
            writer,
            mapper,
        }
    }

    /// The per-user seen history store.
    #[must_use]
    pub fn sessions(&self) -> &SeenStore {
        &self.sessions
    }

    /// One chat turn: analyze, adjust, retrieve, record, answer.
    ///
    /// # Errors
    ///
    /// Returns an error when the classifier, the embedding oracle, or the
    /// answer writer is unreachable. "Nothing matched" is not an error.
    pub async fn chat(&self, user_id: &str, query: &str) -> Result<ChatReply> {
        let seen: HashSet<i64> = self
            .sessions
            .get_seen_ids(user_id)
            .await
            .into_iter()
            .collect();

        let raw = self
            .classifier
            .analyze(query)
            .await
            .context("intent classification failed")?;
        let tags = normalize_tags(&raw);
        tracing::debug!(
            event = PipelineEvent::TagsNormalized.as_str(),
            user_id,
            ?tags,
            "classifier output normalized"
        );
        let tags = adjust_tags(tags, query);
        tracing::debug!(
            event = PipelineEvent::TagsAdjusted.as_str(),
            user_id,
            ?tags,
            "keyword rules applied"
        );
        let tags =
            inherit_context(tags, query, user_id, &self.sessions, self.recommender.catalog())
                .await;

        let prev = match self.sessions.get_last_seen(user_id).await {
            Some(record) => self.recommender.catalog().get(record.recipe_id).cloned(),
            None => None,
        };

        let recipe = self.recommender.next_recipe(query, &tags, &seen).await?;
        let Some(recipe) = recipe else {
            tracing::info!(
                event = PipelineEvent::NoRecipe.as_str(),
                user_id,
                "no recipe matched the request"
            );
            return Ok(ChatReply {
                answer: NO_MATCH_ANSWER.to_string(),
                recipe: None,
                tags,
            });
        };

        self.sessions.record_seen(user_id, recipe.recipe_id).await;
        let answer = self
            .writer
            .respond(query, &recipe, prev.as_ref())
            .await
            .context("answer generation failed")?;
        tracing::debug!(
            event = PipelineEvent::AnswerGenerated.as_str(),
            user_id,
            recipe_id = recipe.recipe_id,
            "answer generated"
        );
        Ok(ChatReply {
            answer,
            recipe: Some(recipe),
            tags,
        })
    }

    /// One pantry turn: map, clean, match, record, answer.
    ///
    /// # Errors
    ///
    /// Returns an error when the answer writer is unreachable. The mapper
    /// never fails (it falls back to the raw list).
    pub async fn pantry(&self, user_id: &str, items: &[String]) -> Result<ChatReply> {
        let mapped = match &self.mapper {
            Some(mapper) => {
                let mapped = mapper.normalize_ingredients(items).await;
                tracing::debug!(
                    event = PipelineEvent::PantryNormalized.as_str(),
                    user_id,
                    raw_count = items.len(),
                    mapped_count = mapped.len(),
                    "pantry list normalized"
                );
                mapped
            }
            None => items.to_vec(),
        };
        let ingredients = clean_ingredient_tokens(&mapped);
        let tags = TagSet {
            category: Vec::new(),
            ingredients: ingredients.clone(),
            mode: MealMode::Fridge,
        };

        let seen: HashSet<i64> = self
            .sessions
            .get_seen_ids(user_id)
            .await
            .into_iter()
            .collect();
        let prev = match self.sessions.get_last_seen(user_id).await {
            Some(record) => self.recommender.catalog().get(record.recipe_id).cloned(),
            None => None,
        };

        let Some(recipe) = self
            .recommender
            .next_recipe_from_fridge(&ingredients, &seen)
            .await
        else {
            tracing::info!(
                event = PipelineEvent::NoRecipe.as_str(),
                user_id,
                "no recipe matched the pantry list"
            );
            return Ok(ChatReply {
                answer: NO_MATCH_ANSWER.to_string(),
                recipe: None,
                tags,
            });
        };

        self.sessions.record_seen(user_id, recipe.recipe_id).await;
        let query = format!("냉장고 재료: {}", ingredients.join(", "));
        let answer = self
            .writer
            .respond(&query, &recipe, prev.as_ref())
            .await
            .context("answer generation failed")?;
        Ok(ChatReply {
            answer,
            recipe: Some(recipe),
            tags,
        })
    }
}
