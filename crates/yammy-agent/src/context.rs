//! Context inheritance for follow-up utterances.
//!
//! "그거 말고", "다른 거" and similar follow-ups usually arrive with no
//! category of their own; the previous recommendation's category carries
//! forward so the next pick stays in the same lane.

use yammy_retrieval::Catalog;
use yammy_session::SeenStore;
use yammy_tags::is_follow_up;
use yammy_types::TagSet;

use crate::observability::PipelineEvent;

/// Inherit the previous recommendation's category on follow-up utterances.
///
/// No-op unless the query reads as a follow-up AND the current category is
/// empty AND the user has a surviving seen record whose item resolves to at
/// least one category label.
pub async fn inherit_context(
    tags: TagSet,
    query: &str,
    user_id: &str,
    sessions: &SeenStore,
    catalog: &Catalog,
) -> TagSet {
    if !tags.category.is_empty() || !is_follow_up(query) {
        return tags;
    }
    let Some(last) = sessions.get_last_seen(user_id).await else {
        return tags;
    };
    let Some(category) = catalog.categories_of(last.recipe_id).first() else {
        return tags;
    };
    tracing::debug!(
        event = PipelineEvent::ContextInherited.as_str(),
        user_id,
        recipe_id = last.recipe_id,
        category = %category,
        "follow-up inherited previous category"
    );
    TagSet {
        category: vec![category.clone()],
        ..tags
    }
}
