use serde::{Deserialize, Serialize};

use super::taste::{TasteVector, TASTE_DIMENSIONS};
use crate::error::{AppError, AppResult};

/// Raw catalog entry as it appears in the bundled JSON
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    pub id: u32,
    pub title: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub v: Vec<f64>,
}

/// Immutable, validated catalog entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recipe {
    pub id: u32,
    pub title: String,
    pub ingredients: Vec<String>,
    /// Descriptive tags, duplicates removed, display order kept
    pub tags: Vec<String>,
    #[serde(rename = "v")]
    pub vector: TasteVector,
}

impl TryFrom<RecipeRecord> for Recipe {
    type Error = AppError;

    /// Validates a raw record. Vectors are checked strictly rather than
    /// clamped: a bundled recipe with an out-of-range component is a data bug.
    fn try_from(record: RecipeRecord) -> AppResult<Self> {
        if record.title.trim().is_empty() {
            return Err(AppError::InvalidCatalog(format!(
                "Recipe {} has an empty title",
                record.id
            )));
        }

        if record.v.len() != TASTE_DIMENSIONS {
            return Err(AppError::DimensionMismatch {
                expected: TASTE_DIMENSIONS,
                actual: record.v.len(),
            });
        }

        if let Some(bad) = record
            .v
            .iter()
            .find(|c| !c.is_finite() || !(0.0..=1.0).contains(*c))
        {
            return Err(AppError::InvalidCatalog(format!(
                "Recipe {} has taste component {} outside [0, 1]",
                record.id, bad
            )));
        }

        if record.ingredients.iter().any(|i| i.trim().is_empty()) {
            return Err(AppError::InvalidCatalog(format!(
                "Recipe {} has a blank ingredient",
                record.id
            )));
        }

        let mut tags: Vec<String> = Vec::with_capacity(record.tags.len());
        for tag in record.tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(Recipe {
            id: record.id,
            title: record.title,
            ingredients: record.ingredients,
            tags,
            vector: TasteVector::from_slice(&record.v)?,
        })
    }
}

/// A recipe with its blended recommendation score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedRecipe<'a> {
    /// 1-based position after ranking
    pub rank: usize,
    #[serde(flatten)]
    pub recipe: &'a Recipe,
    /// Blended score; not guaranteed to be in [0, 1] for arbitrary weights
    pub score: f64,
    /// Cosine similarity between profile and recipe
    pub similarity: f64,
    /// Fraction of on-hand ingredients this recipe uses
    pub availability: f64,
}

impl RankedRecipe<'_> {
    /// Score as a whole percentage for display
    pub fn compatibility_percent(&self) -> u32 {
        (self.score * 100.0).round().max(0.0) as u32
    }
}
