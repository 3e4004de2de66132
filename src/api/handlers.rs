use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{RankedRecipe, Recipe, TasteDimension, TasteVector},
    services::{OnHand, ProfileUpdate, QuizAdjustment, RecommendationRanker, TasteQuiz},
};

use super::{
    extract::{AppJson, AppQuery},
    AppState,
};

// Request/Response types

/// Quiz result: either explicit slider values or step adjustments from the default
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InitProfileRequest {
    Values { values: Vec<f64> },
    Adjustments { adjustments: Vec<QuizAdjustment> },
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Comma-separated ingredients on hand
    pub have: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub recipe_id: u32,
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct DimensionValue {
    pub dimension: TasteDimension,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub vector: TasteVector,
    pub dimensions: Vec<DimensionValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
}

impl From<&TasteVector> for ProfileResponse {
    fn from(vector: &TasteVector) -> Self {
        Self {
            vector: *vector,
            dimensions: vector
                .labeled()
                .map(|(dimension, value)| DimensionValue { dimension, value })
                .collect(),
            persisted: None,
        }
    }
}

impl From<ProfileUpdate> for ProfileResponse {
    fn from(update: ProfileUpdate) -> Self {
        Self {
            persisted: Some(update.persisted),
            ..Self::from(&update.profile)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub rank: usize,
    pub id: u32,
    pub title: String,
    pub ingredients: Vec<String>,
    pub tags: Vec<String>,
    pub score: f64,
    pub similarity: f64,
    pub availability: f64,
    pub compatibility_percent: u32,
}

impl From<&RankedRecipe<'_>> for RecommendationResponse {
    fn from(ranked: &RankedRecipe<'_>) -> Self {
        Self {
            rank: ranked.rank,
            id: ranked.recipe.id,
            title: ranked.recipe.title.clone(),
            ingredients: ranked.recipe.ingredients.clone(),
            tags: ranked.recipe.tags.clone(),
            score: ranked.score,
            similarity: ranked.similarity,
            availability: ranked.availability,
            compatibility_percent: ranked.compatibility_percent(),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Taste dimension names in vector order
pub async fn get_dimensions() -> Json<Vec<&'static str>> {
    Json(TasteDimension::ALL.iter().map(|d| d.name()).collect())
}

/// Get the recipe catalog
pub async fn get_recipes(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.catalog.recipes().to_vec())
}

/// Get the current taste profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let profile = state.session.current().await;
    Json(ProfileResponse::from(&profile))
}

/// Initialize (or re-take) the taste quiz
pub async fn init_profile(
    State(state): State<AppState>,
    AppJson(request): AppJson<InitProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let vector = match request {
        InitProfileRequest::Values { values } => TasteVector::from_slice(&values)?,
        InitProfileRequest::Adjustments { adjustments } => {
            adjustments.into_iter().collect::<TasteQuiz>().finish()
        }
    };

    let update = state.session.replace(vector).await;

    tracing::info!(persisted = update.persisted, "Taste profile initialized");

    Ok(Json(ProfileResponse::from(update)))
}

/// Rank the catalog for the current profile
pub async fn get_recommendations(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<RecommendationQuery>,
) -> Json<Vec<RecommendationResponse>> {
    let profile = state.session.current().await;
    let on_hand = params
        .have
        .as_deref()
        .map(OnHand::parse)
        .unwrap_or_default();

    let ranker = RecommendationRanker::new(&state.catalog);
    let ranked = match params.limit {
        Some(limit) => ranker.top(&profile, &on_hand, limit),
        None => ranker.rank(&profile, &on_hand),
    };

    Json(ranked.iter().map(RecommendationResponse::from).collect())
}

/// Rate a recipe and adapt the profile toward it
pub async fn submit_feedback(
    State(state): State<AppState>,
    AppJson(request): AppJson<FeedbackRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let recipe = state
        .catalog
        .get(request.recipe_id)
        .ok_or_else(|| AppError::NotFound(format!("Recipe {}", request.recipe_id)))?;

    let update = state
        .session
        .record_feedback(&recipe.vector, request.rating)
        .await
        .map_err(|e| {
            tracing::warn!(
                recipe_id = request.recipe_id,
                rating = request.rating,
                error = %e,
                "Rejected feedback"
            );
            e
        })?;

    tracing::info!(
        recipe_id = request.recipe_id,
        rating = request.rating,
        persisted = update.persisted,
        "Taste profile updated from feedback"
    );

    Ok(Json(ProfileResponse::from(update)))
}
