//! yammy-retrieval - Candidate retrieval and selection over the recipe catalog
//!
//! Implements the hybrid retrieval strategy:
//!
//! ```text
//! yammy-retrieval/src/
//! ├── lib.rs     # Re-exports (this file)
//! ├── error.rs   # CatalogError, RetrievalError
//! ├── catalog.rs # Immutable snapshot: recipes + vector matrix + id maps
//! ├── embed.rs   # Embedder trait, HashedEmbedder, cosine similarity
//! ├── query.rs   # Composite query construction (semantic boosting)
//! ├── search.rs  # Stage A hard filter + Stage B top-K similarity ranking
//! ├── fridge.rs  # Pantry-mode variant matching (no embeddings)
//! └── select.rs  # Seen-exclusion + softmax / deterministic selection
//! ```
//!
//! The catalog snapshot is loaded once at startup and read-only afterwards;
//! retrieval is bounded in-memory work proportional to catalog size.

mod catalog;
mod embed;
mod error;
mod fridge;
mod query;
mod search;
mod select;

pub use catalog::{Catalog, CatalogEntry};
pub use embed::{Embedder, HashedEmbedder, cosine_similarity};
pub use error::{CatalogError, RetrievalError};
pub use fridge::{fridge_candidates, pick_fridge};
pub use query::{INGREDIENT_BOOST_REPEAT, build_query_text, category_boost_phrase};
pub use search::{ScoredCandidate, TOP_K, candidates, hard_filter};
pub use select::{select_candidate, softmax};
