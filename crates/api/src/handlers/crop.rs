//! Handlers for crop recommendation.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use seedsync_core::crop::CropInput;
use seedsync_core::error::CoreError;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::run_model;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CropPrediction {
    pub predicted_crop: String,
}

/// POST /api/crop/predict-crop
pub async fn predict_crop(
    State(state): State<AppState>,
    Json(input): Json<CropInput>,
) -> AppResult<Json<CropPrediction>> {
    input.validate().map_err(CoreError::from)?;

    let features = input.features();
    let classifier = Arc::clone(&state.crop_classifier);
    let prediction = run_model(move || classifier.classify(&features)).await?;

    tracing::debug!(crop = %prediction.label, confidence = prediction.confidence, "Crop predicted");
    Ok(Json(CropPrediction {
        predicted_crop: prediction.label,
    }))
}
