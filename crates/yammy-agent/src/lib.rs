//! Yammy pipeline orchestration: classifier → tag rules → retrieval →
//! session record → answer writer.
//!
//! - Core API: [`RecommendService::next_recipe`] and
//!   [`RecommendService::next_recipe_from_fridge`], with the seen history in
//!   [`yammy_session::SeenStore`].
//! - Conversation surface: [`ChatService::chat`] / [`ChatService::pantry`],
//!   which add the external LLM collaborators around the core.
//!
//! Logging: set `RUST_LOG=yammy_agent=debug` to see pipeline events on stderr.

#![allow(missing_docs)]

mod config;
mod context;
mod embedding;
mod json_guard;
mod llm;
mod observability;
mod service;
#[doc(hidden)]
pub mod test_support;

pub use config::{
    CatalogSettings, DEFAULT_CHAT_COMPLETIONS_URL, DEFAULT_EMBED_BASE_URL, EmbeddingSettings,
    LlmSettings, SelectionSettings, SessionSettings, Settings,
};
pub use context::inherit_context;
pub use embedding::EmbeddingClient;
pub use json_guard::{extract_json_array, extract_json_object};
pub use llm::{
    AnswerWriter, ChatMessage, IntentClassifier, LlmClient, PantryMapper,
    classifier_system_prompt, responder_user_prompt,
};
pub use observability::PipelineEvent;
pub use service::{ChatService, NO_MATCH_ANSWER, RecommendService};
