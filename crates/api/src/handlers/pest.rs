//! Handler for pest and disease risk advice.

use axum::extract::State;
use axum::Json;
use seedsync_core::error::CoreError;
use seedsync_core::pest::{
    parse_pest_disease_advice, pest_disease_prompt, PestDiseaseAdvice, PestDiseaseInput,
};
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/pest-disease/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<PestDiseaseInput>,
) -> AppResult<Json<PestDiseaseAdvice>> {
    input.validate().map_err(CoreError::from)?;

    let text = state
        .text_generator
        .generate(&pest_disease_prompt(&input))
        .await?;
    tracing::debug!(crop = %input.crop, response_len = text.len(), "Pest advice generated");

    Ok(Json(parse_pest_disease_advice(&text)))
}
