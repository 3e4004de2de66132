use crate::models::TasteVector;

/// Cosine similarity between two taste vectors
///
/// Defined as 0 when either vector has zero magnitude so that ranking never
/// sees NaN. For non-negative vectors the result lies in [0, 1].
pub fn cosine(a: &TasteVector, b: &TasteVector) -> f64 {
    let denom = a.magnitude() * b.magnitude();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}
