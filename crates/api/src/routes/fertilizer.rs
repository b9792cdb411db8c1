//! Route definitions for fertilizer recommendation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::fertilizer;
use crate::state::AppState;

/// Fertilizer routes, nested under `/fertilizer`.
///
/// ```text
/// GET    /           index
/// POST   /predict    predict
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fertilizer::index))
        .route("/predict", post(fertilizer::predict))
}
