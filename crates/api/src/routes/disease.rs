//! Route definitions for plant disease detection.

use axum::routing::post;
use axum::Router;

use crate::handlers::disease;
use crate::state::AppState;

/// Disease routes, nested under `/disease`.
///
/// ```text
/// POST   /predict_disease    predict_disease (multipart `file`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/predict_disease", post(disease::predict_disease))
}
