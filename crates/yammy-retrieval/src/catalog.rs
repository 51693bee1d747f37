//! Immutable catalog snapshot: recipes + precomputed embedding vectors.
//!
//! Loaded once at startup from a JSON artifact and treated as read-only
//! for the process lifetime; hot-reload is out of scope.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use yammy_types::Recipe;

use crate::error::CatalogError;

/// One row of the snapshot artifact: recipe metadata + embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Recipe metadata, flattened into the same JSON object.
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Precomputed embedding of the recipe text.
    pub vector: Vec<f32>,
}

/// Read-only catalog snapshot.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) vectors: Vec<Vec<f32>>,
    by_id: HashMap<i64, usize>,
    dimension: usize,
}

impl Catalog {
    /// Build a snapshot from parsed entries.
    ///
    /// The first entry fixes the vector dimension; every later entry must
    /// agree. An empty entry list yields an empty catalog, which is a
    /// normal "no recommendation" source, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyVector`], [`CatalogError::DimensionMismatch`]
    /// or [`CatalogError::DuplicateId`] on inconsistent input.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut recipes = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut dimension = 0;

        for entry in entries {
            let recipe_id = entry.recipe.recipe_id;
            if entry.vector.is_empty() {
                return Err(CatalogError::EmptyVector(recipe_id));
            }
            if dimension == 0 {
                dimension = entry.vector.len();
            } else if entry.vector.len() != dimension {
                return Err(CatalogError::DimensionMismatch {
                    expected: dimension,
                    actual: entry.vector.len(),
                    recipe_id,
                });
            }
            if by_id.insert(recipe_id, recipes.len()).is_some() {
                return Err(CatalogError::DuplicateId(recipe_id));
            }
            recipes.push(entry.recipe);
            vectors.push(entry.vector);
        }

        Ok(Self {
            recipes,
            vectors,
            by_id,
            dimension,
        })
    }

    /// Load a snapshot from a JSON artifact on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] / [`CatalogError::Parse`] on unreadable
    /// or malformed files, plus the validation errors of [`Catalog::from_entries`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&json)?;
        let catalog = Self::from_entries(entries)?;
        tracing::info!(
            event = "catalog.loaded",
            path = %path.display(),
            items = catalog.len(),
            dimension = catalog.dimension(),
            "catalog snapshot loaded"
        );
        Ok(catalog)
    }

    /// Number of items in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the snapshot holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Vector dimension shared by every item (0 for an empty catalog).
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Full record lookup by id.
    #[must_use]
    pub fn get(&self, recipe_id: i64) -> Option<&Recipe> {
        self.by_id.get(&recipe_id).map(|idx| &self.recipes[*idx])
    }

    /// Category labels for an id; empty when the id is unknown.
    #[must_use]
    pub fn categories_of(&self, recipe_id: i64) -> &[String] {
        self.get(recipe_id)
            .map_or(&[], |recipe| recipe.categories.as_slice())
    }

    /// All recipe ids in snapshot order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.recipes.iter().map(|r| r.recipe_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn entry(recipe_id: i64, name: &str, vector: Vec<f32>) -> CatalogEntry {
        CatalogEntry {
            recipe: Recipe {
                recipe_id,
                name: name.to_string(),
                serving: None,
                time: None,
                ingredient: "재료".to_string(),
                spicy_ingredient: None,
                method: None,
                categories: vec!["기타".to_string()],
            },
            vector,
        }
    }

    #[test]
    fn builds_and_looks_up_by_id() {
        let catalog = Catalog::from_entries(vec![
            entry(10, "김치찌개", vec![1.0, 0.0]),
            entry(20, "잡채", vec![0.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dimension(), 2);
        assert_eq!(catalog.get(20).map(|r| r.name.as_str()), Some("잡채"));
        assert!(catalog.get(99).is_none());
        assert_eq!(catalog.categories_of(10), ["기타"]);
        assert!(catalog.categories_of(99).is_empty());
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = Catalog::from_entries(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.dimension(), 0);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let err = Catalog::from_entries(vec![
            entry(1, "a", vec![1.0, 0.0]),
            entry(2, "b", vec![1.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DimensionMismatch {
                expected: 2,
                actual: 1,
                recipe_id: 2
            }
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::from_entries(vec![
            entry(1, "a", vec![1.0]),
            entry(1, "b", vec![2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn rejects_empty_vector() {
        let err = Catalog::from_entries(vec![entry(1, "a", Vec::new())]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyVector(1)));
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::json!([
            {
                "recipe_id": 1,
                "name": "김치찌개",
                "ingredient": "김치 돼지고기 두부",
                "spicy_ingredient": "고춧가루",
                "categories": ["찌개"],
                "vector": [0.1, 0.2, 0.3]
            }
        ]);
        file.write_all(json.to_string().as_bytes()).unwrap();
        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.dimension(), 3);
        assert_eq!(
            catalog.get(1).map(|r| r.ingredient_text()),
            Some("김치 돼지고기 두부 고춧가루".to_string())
        );
    }
}
