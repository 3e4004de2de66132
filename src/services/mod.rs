pub mod catalog;
pub mod preference;
pub mod profile;
pub mod quiz;
pub mod ranking;
pub mod similarity;

pub use catalog::RecipeCatalog;
pub use profile::{ProfileSession, ProfileUpdate};
pub use quiz::{QuizAdjustment, TasteQuiz};
pub use ranking::{OnHand, RecommendationRanker};
