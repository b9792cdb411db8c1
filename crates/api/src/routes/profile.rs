//! Route definitions for user profiles.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Profile routes, nested under `/profile`.
///
/// ```text
/// GET    /{user_id}          get
/// POST   /{user_id}          update
/// PATCH  /{user_id}          patch
/// DELETE /{user_id}          delete
/// POST   /{user_id}/image    upload_image (multipart `image`)
/// DELETE /{user_id}/image    remove_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}",
            get(profile::get)
                .post(profile::update)
                .patch(profile::patch)
                .delete(profile::delete),
        )
        .route(
            "/{user_id}/image",
            post(profile::upload_image).delete(profile::remove_image),
        )
}
