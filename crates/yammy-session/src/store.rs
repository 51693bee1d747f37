//! In-memory seen store: user_id → timestamped recipe ids.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Default retention window for seen records: 12 hours.
pub const DEFAULT_SEEN_TTL_MS: i64 = 12 * 60 * 60 * 1000;

/// One "already shown" entry for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenRecord {
    /// Recipe that was recommended.
    pub recipe_id: i64,
    /// Unix-millis timestamp of the recommendation.
    pub seen_at: i64,
}

/// In-memory store: user_id → list of seen records in insertion order.
///
/// Eviction is lazy: expired records are dropped when a user's history is
/// read, never by a background sweep. Memory for users who stop reading
/// persists until process restart; a known scaling caveat, left as-is.
pub struct SeenStore {
    inner: Arc<RwLock<HashMap<String, Vec<SeenRecord>>>>,
    ttl_ms: i64,
}

impl SeenStore {
    /// Create a store with the default 12-hour TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl_ms(DEFAULT_SEEN_TTL_MS)
    }

    /// Create a store with an explicit TTL in milliseconds.
    #[must_use]
    pub fn with_ttl_ms(ttl_ms: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl_ms,
        }
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Record that `recipe_id` was shown to `user_id` now.
    pub async fn record_seen(&self, user_id: &str, recipe_id: i64) {
        self.record_seen_at(user_id, recipe_id, Self::now_ms()).await;
    }

    /// Record a seen entry with an explicit timestamp.
    pub async fn record_seen_at(&self, user_id: &str, recipe_id: i64, now_ms: i64) {
        let mut g = self.inner.write().await;
        let entry = g.entry(user_id.to_string()).or_default();
        entry.push(SeenRecord {
            recipe_id,
            seen_at: now_ms,
        });
        tracing::debug!(
            event = "session.seen.recorded",
            user_id,
            recipe_id,
            total_records = entry.len(),
            "seen record appended"
        );
    }

    /// Surviving seen recipe ids for a user, in insertion order.
    ///
    /// Applies lazy TTL eviction before returning.
    pub async fn get_seen_ids(&self, user_id: &str) -> Vec<i64> {
        self.get_seen_ids_at(user_id, Self::now_ms()).await
    }

    /// Surviving seen ids relative to an explicit "now".
    pub async fn get_seen_ids_at(&self, user_id: &str, now_ms: i64) -> Vec<i64> {
        let mut g = self.inner.write().await;
        let Some(records) = g.get_mut(user_id) else {
            return Vec::new();
        };
        let before = records.len();
        records.retain(|r| now_ms - r.seen_at < self.ttl_ms);
        let evicted = before - records.len();
        let ids: Vec<i64> = records.iter().map(|r| r.recipe_id).collect();
        if records.is_empty() {
            g.remove(user_id);
        }
        if evicted > 0 {
            tracing::debug!(
                event = "session.seen.evicted",
                user_id,
                evicted,
                surviving = ids.len(),
                "expired seen records dropped"
            );
        }
        ids
    }

    /// Most recent surviving seen record for a user, or `None`.
    pub async fn get_last_seen(&self, user_id: &str) -> Option<SeenRecord> {
        self.get_last_seen_at(user_id, Self::now_ms()).await
    }

    /// Most recent surviving record relative to an explicit "now".
    pub async fn get_last_seen_at(&self, user_id: &str, now_ms: i64) -> Option<SeenRecord> {
        let mut g = self.inner.write().await;
        let records = g.get_mut(user_id)?;
        records.retain(|r| now_ms - r.seen_at < self.ttl_ms);
        let last = records.last().copied();
        if records.is_empty() {
            g.remove(user_id);
        }
        last
    }
}

impl Default for SeenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seen_ids_come_back_in_insertion_order() {
        let store = SeenStore::new();
        store.record_seen("u1", 3).await;
        store.record_seen("u1", 1).await;
        store.record_seen("u1", 2).await;
        assert_eq!(store.get_seen_ids("u1").await, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn unknown_user_has_no_history() {
        let store = SeenStore::new();
        assert!(store.get_seen_ids("nobody").await.is_empty());
        assert!(store.get_last_seen("nobody").await.is_none());
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = SeenStore::new();
        store.record_seen("u1", 1).await;
        store.record_seen("u2", 2).await;
        assert_eq!(store.get_seen_ids("u1").await, vec![1]);
        assert_eq!(store.get_seen_ids("u2").await, vec![2]);
    }

    #[tokio::test]
    async fn records_survive_until_ttl_boundary() {
        let store = SeenStore::new();
        let t0 = 1_000_000;
        store.record_seen_at("u1", 7, t0).await;
        // One millisecond before expiry: still visible.
        let ids = store
            .get_seen_ids_at("u1", t0 + DEFAULT_SEEN_TTL_MS - 1)
            .await;
        assert_eq!(ids, vec![7]);
        // At the boundary: gone.
        let ids = store.get_seen_ids_at("u1", t0 + DEFAULT_SEEN_TTL_MS).await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn eviction_drops_only_expired_records() {
        let store = SeenStore::with_ttl_ms(100);
        store.record_seen_at("u1", 1, 0).await;
        store.record_seen_at("u1", 2, 80).await;
        assert_eq!(store.get_seen_ids_at("u1", 120).await, vec![2]);
    }

    #[tokio::test]
    async fn last_seen_is_most_recent_surviving() {
        let store = SeenStore::with_ttl_ms(100);
        store.record_seen_at("u1", 1, 0).await;
        store.record_seen_at("u1", 2, 50).await;
        let last = store.get_last_seen_at("u1", 120).await;
        assert_eq!(
            last,
            Some(SeenRecord {
                recipe_id: 2,
                seen_at: 50
            })
        );
        // Everything expired → none.
        assert!(store.get_last_seen_at("u1", 500).await.is_none());
    }
}
