//! Handlers for the government schemes catalogue.

use axum::extract::{Path, Query, State};
use axum::Json;
use seedsync_core::schemes::{Scheme, SchemePage, SchemeQuery};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/schemes
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SchemeQuery>,
) -> AppResult<Json<SchemePage>> {
    Ok(Json(state.schemes.search(&query)?))
}

/// GET /api/schemes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Scheme>> {
    Ok(Json(state.schemes.find(&id)?.clone()))
}
