//! Handler for AI crop-rotation advice.

use axum::extract::State;
use axum::Json;
use seedsync_core::error::CoreError;
use seedsync_core::rotation::{parse_rotation_advice, rotation_prompt, RotationAdvice, RotationInput};
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/crop-rotation/generate-advice
pub async fn generate_advice(
    State(state): State<AppState>,
    Json(input): Json<RotationInput>,
) -> AppResult<Json<RotationAdvice>> {
    input.validate().map_err(CoreError::from)?;

    let text = state.text_generator.generate(&rotation_prompt(&input)).await?;
    let advice = parse_rotation_advice(&text);

    tracing::info!(
        current_crop = %input.current_crop,
        next_crop = %advice.next_crop,
        "Generated rotation advice",
    );
    Ok(Json(advice))
}
