use axum::routing::post;
use axum::Router;

use crate::handlers::rotation;
use crate::state::AppState;

/// Crop-rotation routes, nested under `/crop-rotation`.
///
/// ```text
/// POST   /generate-advice    generate_advice
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-advice", post(rotation::generate_advice))
}
