//! Route definitions for crop recommendation.

use axum::routing::post;
use axum::Router;

use crate::handlers::crop;
use crate::state::AppState;

/// Crop routes, nested under `/crop`.
///
/// ```text
/// POST   /predict-crop    predict_crop
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/predict-crop", post(crop::predict_crop))
}
