//! Route definitions for the government schemes catalogue.

use axum::routing::get;
use axum::Router;

use crate::handlers::schemes;
use crate::state::AppState;

/// Scheme routes, nested under `/schemes`.
///
/// ```text
/// GET    /        list (query: search, state, scheme_type, crop_type, limit, offset)
/// GET    /{id}    get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schemes::list))
        .route("/{id}", get(schemes::get_by_id))
}
