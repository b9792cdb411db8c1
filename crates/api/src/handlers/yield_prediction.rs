//! Handlers for crop yield prediction.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use seedsync_core::crop_yield::{round2, YieldInput, FALLBACK_NOTE, YIELD_UNIT};
use seedsync_core::error::CoreError;
use seedsync_inference::InferenceError;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::run_model;
use crate::state::AppState;

/// Confidence reported for predictions from the trained model.
const MODEL_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Serialize)]
pub struct YieldPrediction {
    pub predicted_yield: f64,
    pub unit: &'static str,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// POST /api/yield/predict
///
/// Uses the trained regressor when one was loaded, otherwise the heuristic
/// fallback estimator.
pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<YieldInput>,
) -> AppResult<Json<YieldPrediction>> {
    input.validate().map_err(CoreError::from)?;

    let Some(regressor) = state.yield_regressor.as_ref().map(Arc::clone) else {
        let estimate = state.yield_fallback.estimate(&input);
        tracing::debug!(crop = %input.crop, yield_ = estimate.predicted_yield, "Fallback yield estimate");
        return Ok(Json(YieldPrediction {
            predicted_yield: estimate.predicted_yield,
            unit: YIELD_UNIT,
            confidence: estimate.confidence,
            note: Some(FALLBACK_NOTE),
        }));
    };

    let value = run_model(move || {
        let value = regressor.predict(&input)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(InferenceError::Execution(format!(
                "model returned a non-finite yield ({value})"
            )))
        }
    })
    .await?;

    Ok(Json(YieldPrediction {
        predicted_yield: round2(value),
        unit: YIELD_UNIT,
        confidence: MODEL_CONFIDENCE,
        note: None,
    }))
}
