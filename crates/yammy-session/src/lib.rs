//! yammy-session - Per-user seen-recipe history.
//!
//! Tracks which recipes each user has already been shown within a TTL
//! window, so repeated requests in one conversation rotate instead of
//! echoing. The store is an explicit object constructed at process start
//! and passed into the pipeline; there is no ambient global state.

mod store;

pub use store::{DEFAULT_SEEN_TTL_MS, SeenRecord, SeenStore};
