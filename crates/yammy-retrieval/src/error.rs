//! Error types for catalog loading and retrieval.

use thiserror::Error;

/// Error types for loading and validating the catalog snapshot
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse the snapshot artifact
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Entry vector disagrees with the catalog dimension
    #[error("vector dimension mismatch for recipe {recipe_id}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension fixed by the first entry
        expected: usize,
        /// Dimension found on the offending entry
        actual: usize,
        /// Offending recipe id
        recipe_id: i64,
    },
    /// Entry carries no embedding vector
    #[error("empty embedding vector for recipe {0}")]
    EmptyVector(i64),
    /// Two entries share one recipe id
    #[error("duplicate recipe id: {0}")]
    DuplicateId(i64),
}

/// Error types for candidate retrieval
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The embedding oracle failed; no ranking is possible without vectors
    #[error("embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),
    /// Query vector dimension differs from the catalog's
    #[error("query vector dimension mismatch: expected {expected}, got {actual}")]
    QueryDimension {
        /// Catalog vector dimension
        expected: usize,
        /// Query vector dimension returned by the embedder
        actual: usize,
    },
}
