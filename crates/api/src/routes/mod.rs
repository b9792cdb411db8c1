pub mod crop;
pub mod disease;
pub mod fertilizer;
pub mod health;
pub mod pest;
pub mod profile;
pub mod rotation;
pub mod schemes;
pub mod yield_prediction;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /crop
///     /predict-crop                      crop recommendation (POST)
///
/// /fertilizer
///     /                                  banner (GET)
///     /predict                           fertilizer recommendation (POST)
///
/// /yield
///     /predict                           yield prediction (POST)
///
/// /disease
///     /predict_disease                   leaf image diagnosis (POST, multipart)
///
/// /crop-rotation
///     /generate-advice                   rotation advice (POST)
///
/// /pest-disease
///     /predict                           pest risk advice (POST)
///
/// /schemes                               list/filter (GET)
///     /{id}                              get (GET)
///
/// /profile
///     /{user_id}                         get, update, patch, delete
///     /{user_id}/image                   upload (POST), remove (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/crop", crop::router())
        .nest("/fertilizer", fertilizer::router())
        // Clients call the banner with a trailing slash.
        .route("/fertilizer/", get(handlers::fertilizer::index))
        .nest("/yield", yield_prediction::router())
        .nest("/disease", disease::router())
        .nest("/crop-rotation", rotation::router())
        .nest("/pest-disease", pest::router())
        .nest("/schemes", schemes::router())
        .nest("/profile", profile::router())
}
