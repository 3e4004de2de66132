pub mod recipe;
pub mod taste;

pub use recipe::{RankedRecipe, Recipe, RecipeRecord};
pub use taste::{clamp_unit, TasteDimension, TasteVector, DEFAULT_COMPONENT, TASTE_DIMENSIONS};
