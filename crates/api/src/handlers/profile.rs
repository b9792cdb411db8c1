//! Handlers for user profiles and profile images.
//!
//! Profiles live in the injected [`ProfileStore`](seedsync_core::profile::ProfileStore).
//! Image files are written under the configured upload directory and served
//! back through the `/uploads` static route.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use seedsync_core::error::CoreError;
use seedsync_core::profile::{Profile, ProfilePatch, ProfileUpdate};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::{ImageResponse, ProfileResponse};
use crate::state::AppState;
use crate::uploads::{remove_profile_image, save_profile_image};

const UPDATED: &str = "Profile updated successfully";

/// GET /api/profile/{user_id}
///
/// Unknown users get the default profile rather than a 404.
pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let response = match state.profiles.get(&user_id).await? {
        Some(profile) => ProfileResponse::ok("Profile retrieved successfully", profile),
        None => ProfileResponse::ok("Default profile loaded", Profile::default()),
    };
    Ok(Json(response))
}

/// POST /api/profile/{user_id}
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<Json<ProfileResponse>> {
    input.validate().map_err(CoreError::from)?;

    let profile = state.profiles.put(&user_id, input.into_profile()).await?;
    tracing::info!(user_id = %user_id, "Profile updated");
    Ok(Json(ProfileResponse::ok(UPDATED, profile)))
}

/// PATCH /api/profile/{user_id}
pub async fn patch(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<ProfilePatch>,
) -> AppResult<Json<ProfileResponse>> {
    input.validate().map_err(CoreError::from)?;

    let profile = state.profiles.patch(&user_id, input).await?;
    Ok(Json(ProfileResponse::ok(UPDATED, profile)))
}

/// DELETE /api/profile/{user_id}
///
/// The stored image file is removed along with the record.
pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<StatusCode> {
    let removed = state.profiles.delete(&user_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user_id.clone(),
        })
    })?;

    if let Some(url) = removed.profile_image {
        remove_profile_image(&state.config.upload_dir, &user_id, &url).await?;
    }
    tracing::info!(user_id = %user_id, "Profile deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/profile/{user_id}/image
///
/// Multipart upload with an `image` field. Replaces any previous image file.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ImageResponse>> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(AppError::BadRequest("File must be an image".into()));
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'image' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded image is empty".into()));
    }
    let max = state.config.max_image_bytes;
    if data.len() > max {
        return Err(AppError::BadRequest(format!(
            "Image exceeds the maximum size of {max} bytes"
        )));
    }

    let upload_dir = &state.config.upload_dir;
    let url = save_profile_image(upload_dir, &user_id, file_name.as_deref(), &data).await?;
    let previous = state.profiles.replace_image(&user_id, Some(url.clone())).await?;
    if let Some(old) = previous.filter(|old| *old != url) {
        remove_profile_image(upload_dir, &user_id, &old).await?;
    }

    Ok(Json(ImageResponse {
        success: true,
        message: "Profile image uploaded successfully",
        image_url: Some(url),
    }))
}

/// DELETE /api/profile/{user_id}/image
pub async fn remove_image(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ImageResponse>> {
    let message = match state.profiles.replace_image(&user_id, None).await? {
        Some(url) => {
            remove_profile_image(&state.config.upload_dir, &user_id, &url).await?;
            "Profile image removed successfully"
        }
        None => "No profile image to remove",
    };

    Ok(Json(ImageResponse {
        success: true,
        message,
        image_url: None,
    }))
}
