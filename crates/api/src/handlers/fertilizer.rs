//! Handlers for fertilizer recommendation.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use seedsync_core::error::CoreError;
use seedsync_core::fertilizer::{fertilizer_info, FertilizerInput};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::run_model;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub msg: String,
}

#[derive(Debug, Serialize)]
pub struct FertilizerRecommendation {
    pub recommended_fertilizer: String,
    pub confidence: f32,
    pub description: &'static str,
    pub tips: &'static str,
}

/// GET /api/fertilizer/
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        msg: "Fertilizer Recommendation API".to_string(),
    })
}

/// POST /api/fertilizer/predict
///
/// The predicted label is enriched with the static fertilizer guide.
pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<FertilizerInput>,
) -> AppResult<Json<FertilizerRecommendation>> {
    input.validate().map_err(CoreError::from)?;

    let features = input.features();
    let classifier = Arc::clone(&state.fertilizer_classifier);
    let prediction = run_model(move || classifier.classify(&features)).await?;

    let info = fertilizer_info(&prediction.label);
    Ok(Json(FertilizerRecommendation {
        recommended_fertilizer: prediction.label,
        confidence: prediction.confidence,
        description: info.description,
        tips: info.tips,
    }))
}
