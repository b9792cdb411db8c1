use axum::routing::post;
use axum::Router;

use crate::handlers::yield_prediction;
use crate::state::AppState;

/// Yield routes, nested under `/yield`.
///
/// ```text
/// POST   /predict    predict
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(yield_prediction::predict))
}
