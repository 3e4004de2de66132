use std::collections::HashSet;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{Recipe, RecipeRecord},
};

const BUNDLED_CATALOG: &str = include_str!("../../data/recipes.json");

/// Read-only recipe catalog, validated once at load time
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// The catalog shipped with the service
    pub fn bundled() -> AppResult<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Loads and validates a catalog file
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::InvalidCatalog(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&raw)?;

        tracing::info!(
            path = %path.display(),
            recipe_count = catalog.len(),
            "Loaded recipe catalog from file"
        );

        Ok(catalog)
    }

    /// Parses a JSON array of catalog records
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let records: Vec<RecipeRecord> = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidCatalog(format!("Malformed catalog JSON: {}", e)))?;
        Self::from_records(records)
    }

    /// Validates records, keeping their order
    pub fn from_records(records: Vec<RecipeRecord>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        let mut recipes = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.id) {
                return Err(AppError::InvalidCatalog(format!(
                    "Duplicate recipe id {}",
                    record.id
                )));
            }
            recipes.push(Recipe::try_from(record)?);
        }

        Ok(Self { recipes })
    }

    pub fn get(&self, id: u32) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Recipes in catalog insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
