use crate::{
    error::{AppError, AppResult},
    models::TasteVector,
};

/// Lowest accepted feedback rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted feedback rating
pub const MAX_RATING: i64 = 5;
/// Learning rate applied for a top rating
pub const MAX_LEARNING_RATE: f64 = 0.5;

/// Learning rate for a rating: `(rating / 5) * 0.5`
pub fn learning_rate(rating: i64) -> AppResult<f64> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidRating(rating));
    }
    Ok(rating as f64 / MAX_RATING as f64 * MAX_LEARNING_RATE)
}

/// One exponentially-weighted step of `current` toward `recipe`
///
/// Returns a new vector; `current` is never modified, so an invalid rating
/// leaves the caller's profile exactly as it was.
pub fn ewma_update(current: &TasteVector, recipe: &TasteVector, rating: i64) -> AppResult<TasteVector> {
    let alpha = learning_rate(rating)?;
    Ok(current.combine(recipe, alpha))
}
