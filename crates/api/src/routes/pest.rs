use axum::routing::post;
use axum::Router;

use crate::handlers::pest;
use crate::state::AppState;

/// Pest and disease advice routes, nested under `/pest-disease`.
///
/// ```text
/// POST   /predict    predict
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(pest::predict))
}
