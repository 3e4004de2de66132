use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

/// Number of taste dimensions in every profile and recipe vector
pub const TASTE_DIMENSIONS: usize = 7;

/// Starting value for every component of a fresh profile
pub const DEFAULT_COMPONENT: f64 = 0.5;

/// Named taste dimension; the discriminant is the component index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TasteDimension {
    Sweet = 0,
    Salty = 1,
    Sour = 2,
    Bitter = 3,
    Umami = 4,
    Spicy = 5,
    Crunchy = 6,
}

impl TasteDimension {
    /// All dimensions in vector order
    pub const ALL: [TasteDimension; TASTE_DIMENSIONS] = [
        TasteDimension::Sweet,
        TasteDimension::Salty,
        TasteDimension::Sour,
        TasteDimension::Bitter,
        TasteDimension::Umami,
        TasteDimension::Spicy,
        TasteDimension::Crunchy,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TasteDimension::Sweet => "sweet",
            TasteDimension::Salty => "salty",
            TasteDimension::Sour => "sour",
            TasteDimension::Bitter => "bitter",
            TasteDimension::Umami => "umami",
            TasteDimension::Spicy => "spicy",
            TasteDimension::Crunchy => "crunchy",
        }
    }
}

impl Display for TasteDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TasteDimension {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TasteDimension::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown taste dimension: {}", s)))
    }
}

/// Forces a single component into [0, 1]. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Fixed-dimension taste profile with every component in [0, 1]
///
/// The only constructors clamp their input, so a `TasteVector` can never hold
/// an out-of-range component. Serializes as a plain JSON array of 7 numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TasteVector([f64; TASTE_DIMENSIONS]);

impl Default for TasteVector {
    fn default() -> Self {
        Self::uniform(DEFAULT_COMPONENT)
    }
}

impl TasteVector {
    /// Builds a vector from raw values, clamping each component
    pub fn clamped(raw: [f64; TASTE_DIMENSIONS]) -> Self {
        Self(raw.map(clamp_unit))
    }

    /// Every component set to the same (clamped) value
    pub fn uniform(value: f64) -> Self {
        Self::clamped([value; TASTE_DIMENSIONS])
    }

    pub fn zero() -> Self {
        Self([0.0; TASTE_DIMENSIONS])
    }

    /// Builds a vector from a slice of any length, clamping each component
    ///
    /// Fails with `DimensionMismatch` unless the slice has exactly
    /// [`TASTE_DIMENSIONS`] entries.
    pub fn from_slice(values: &[f64]) -> AppResult<Self> {
        let raw: [f64; TASTE_DIMENSIONS] =
            values
                .try_into()
                .map_err(|_| AppError::DimensionMismatch {
                    expected: TASTE_DIMENSIONS,
                    actual: values.len(),
                })?;
        Ok(Self::clamped(raw))
    }

    /// Per-component linear interpolation `self + weight * (target - self)`, clamped
    pub fn combine(&self, target: &TasteVector, weight: f64) -> TasteVector {
        let mut out = [0.0; TASTE_DIMENSIONS];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i] + weight * (target.0[i] - self.0[i]);
        }
        Self::clamped(out)
    }

    /// Moves one dimension by `delta`, staying inside [0, 1]
    pub fn nudge(&self, dimension: TasteDimension, delta: f64) -> TasteVector {
        self.with(dimension, self.get(dimension) + delta)
    }

    /// Replaces one dimension with a clamped value
    pub fn with(&self, dimension: TasteDimension, value: f64) -> TasteVector {
        let mut raw = self.0;
        raw[dimension.index()] = value;
        Self::clamped(raw)
    }

    pub fn get(&self, dimension: TasteDimension) -> f64 {
        self.0[dimension.index()]
    }

    pub fn components(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(self) -> [f64; TASTE_DIMENSIONS] {
        self.0
    }

    pub fn dot(&self, other: &TasteVector) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Components paired with their dimension names, in vector order
    pub fn labeled(&self) -> impl Iterator<Item = (TasteDimension, f64)> + '_ {
        TasteDimension::ALL
            .into_iter()
            .map(move |d| (d, self.get(d)))
    }
}

impl TryFrom<Vec<f64>> for TasteVector {
    type Error = AppError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<TasteVector> for Vec<f64> {
    fn from(vector: TasteVector) -> Self {
        vector.0.to_vec()
    }
}
