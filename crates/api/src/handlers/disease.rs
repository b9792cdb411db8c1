//! Handlers for plant disease detection from leaf images.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use seedsync_core::crop_yield::round2;
use seedsync_core::disease::{
    format_disease_name, parse_disease_tips, prevention_tips_prompt, tips_unavailable_message,
    DiseaseTips,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::run_model;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DiseasePrediction {
    pub predicted_disease: String,
    pub raw_disease_name: String,
    /// Percentage, rounded to two decimals.
    pub confidence: f64,
    pub prevention_tips: String,
    pub structured_info: DiseaseTips,
}

/// POST /api/disease/predict_disease
///
/// Accepts a multipart upload with a `file` field. Tip generation failures
/// are logged and replaced by a fixed message; the prediction still succeeds.
pub async fn predict_disease(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DiseasePrediction>> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            image = Some(data.to_vec());
        }
    }

    let image = image
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let classifier = Arc::clone(&state.disease_classifier);
    let prediction = run_model(move || classifier.classify_image(&image)).await?;

    let display_name = format_disease_name(&prediction.label);
    let prevention_tips = match state
        .text_generator
        .generate(&prevention_tips_prompt(&display_name))
        .await
    {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(disease = %display_name, error = %e, "Prevention tip generation failed");
            tips_unavailable_message(&display_name)
        }
    };
    let structured_info = parse_disease_tips(&prevention_tips, &display_name);

    Ok(Json(DiseasePrediction {
        predicted_disease: display_name,
        raw_disease_name: prediction.label,
        confidence: round2(f64::from(prediction.confidence) * 100.0),
        prevention_tips,
        structured_info,
    }))
}
