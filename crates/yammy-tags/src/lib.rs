//! yammy-tags - Tag normalization and rule adjustment for Yammy
//!
//! Turns raw, possibly malformed classifier output into a well-typed
//! [`TagSet`](yammy_types::TagSet) and patches it with deterministic keyword
//! rules before retrieval:
//!
//! ```text
//! yammy-tags/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── patterns.rs  # Keyword tables and vocabulary-adjacent constants
//! ├── normalize.rs # Never-fails coercion of classifier JSON
//! └── adjust.rs    # Ordered substring rules + follow-up detection
//! ```
//!
//! Everything here is pure: no I/O, no errors, no shared state.

mod adjust;
mod normalize;
pub mod patterns;

pub use adjust::{adjust_tags, is_follow_up};
pub use normalize::{clean_ingredient_tokens, normalize_query, normalize_tags};
