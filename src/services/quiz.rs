use serde::Deserialize;

use crate::models::{TasteDimension, TasteVector};

/// Amount one quiz step moves a dimension
pub const QUIZ_STEP: f64 = 0.1;

/// One slider adjustment from the onboarding quiz
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QuizAdjustment {
    pub dimension: TasteDimension,
    /// Positive steps raise the dimension, negative steps lower it
    pub steps: i32,
}

/// Onboarding quiz that builds the initial taste profile
///
/// Every dimension starts at the default and moves in fixed steps; each step
/// is clamped, so pressing "-" at 0 or "+" at 1 has no effect.
#[derive(Debug, Clone, Default)]
pub struct TasteQuiz {
    values: TasteVector,
}

impl TasteQuiz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increase(&mut self, dimension: TasteDimension) -> f64 {
        self.values = self.values.nudge(dimension, QUIZ_STEP);
        self.values.get(dimension)
    }

    pub fn decrease(&mut self, dimension: TasteDimension) -> f64 {
        self.values = self.values.nudge(dimension, -QUIZ_STEP);
        self.values.get(dimension)
    }

    pub fn set(&mut self, dimension: TasteDimension, value: f64) {
        self.values = self.values.with(dimension, value);
    }

    /// Moves a dimension by `steps` quiz steps in one clamped nudge
    ///
    /// Steps all go the same way, so clamping once at the end matches
    /// clamping after every step.
    pub fn apply(&mut self, adjustment: &QuizAdjustment) {
        let delta = f64::from(adjustment.steps) * QUIZ_STEP;
        self.values = self.values.nudge(adjustment.dimension, delta);
    }

    pub fn current(&self) -> &TasteVector {
        &self.values
    }

    pub fn finish(self) -> TasteVector {
        self.values
    }
}

impl FromIterator<QuizAdjustment> for TasteQuiz {
    fn from_iter<I: IntoIterator<Item = QuizAdjustment>>(iter: I) -> Self {
        let mut quiz = TasteQuiz::new();
        for adjustment in iter {
            quiz.apply(&adjustment);
        }
        quiz
    }
}
