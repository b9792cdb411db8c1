//! Profile image files under the upload directory.
//!
//! Images are written to `<upload_dir>/profile_images/` and referenced by
//! their public URL `/uploads/profile_images/<file>`, which the static file
//! service resolves back to the same path.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{AppError, AppResult};

/// Subdirectory of the upload root holding profile images.
pub const PROFILE_IMAGE_DIR: &str = "profile_images";

/// URL path the upload root is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const DEFAULT_EXTENSION: &str = "jpg";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_EXTENSION_LEN: usize = 10;

/// Restrict a user id to `[A-Za-z0-9_-]` so it is safe in a file name.
pub fn sanitize_user_id(user_id: &str) -> String {
    let cleaned: String = user_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "user".to_string()
    } else {
        cleaned
    }
}

/// Lowercased alphanumeric extension of the uploaded file name, or `jpg`.
pub fn image_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// `<user>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn profile_image_name(user_id: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}.{extension}",
        sanitize_user_id(user_id),
        now.format(TIMESTAMP_FORMAT)
    )
}

pub fn public_url(file_name: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{PROFILE_IMAGE_DIR}/{file_name}")
}

/// Map a public upload URL back to a path under `upload_dir`.
///
/// Returns `None` for URLs outside the upload tree or containing anything
/// other than plain path segments.
pub fn resolve_public_url(upload_dir: &Path, url: &str) -> Option<PathBuf> {
    let relative = url.strip_prefix(UPLOADS_URL_PREFIX)?.strip_prefix('/')?;
    let relative = Path::new(relative);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain || relative.as_os_str().is_empty() {
        return None;
    }
    Some(upload_dir.join(relative))
}

/// Write a profile image and return its public URL.
pub async fn save_profile_image(
    upload_dir: &Path,
    user_id: &str,
    file_name: Option<&str>,
    data: &[u8],
) -> AppResult<String> {
    let dir = upload_dir.join(PROFILE_IMAGE_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create {}: {e}", dir.display())))?;

    let stored = profile_image_name(user_id, &image_extension(file_name), Utc::now());
    let path = dir.join(&stored);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write {}: {e}", path.display())))?;

    tracing::info!(user_id, path = %path.display(), bytes = data.len(), "Saved profile image");
    Ok(public_url(&stored))
}

/// Whether `url` names an image [`save_profile_image`] wrote for `user_id`.
///
/// The file must sit directly in the profile image directory and be named
/// `<sanitized user>_<timestamp>.<ext>`. A prefix match alone is not enough:
/// user `a` must not own `a_b_20240701_090503.png`.
pub fn is_owned_image(user_id: &str, url: &str) -> bool {
    let dir_prefix = format!("{UPLOADS_URL_PREFIX}/{PROFILE_IMAGE_DIR}/");
    let Some(file) = url.strip_prefix(&dir_prefix) else {
        return false;
    };
    let Some(rest) = file.strip_prefix(&format!("{}_", sanitize_user_id(user_id))) else {
        return false;
    };
    let Some((stamp, extension)) = rest.rsplit_once('.') else {
        return false;
    };
    !extension.is_empty()
        && extension.chars().all(|c| c.is_ascii_alphanumeric())
        && NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok()
}

/// Delete `user_id`'s image file behind a public URL.
///
/// References the user does not own are left on disk. A missing file is not
/// an error.
pub async fn remove_profile_image(upload_dir: &Path, user_id: &str, url: &str) -> AppResult<()> {
    if !is_owned_image(user_id, url) {
        tracing::warn!(user_id, url, "Image reference not owned by user, not deleting");
        return Ok(());
    }
    let Some(path) = resolve_public_url(upload_dir, url) else {
        tracing::warn!(url, "Image reference is outside the upload directory, not deleting");
        return Ok(());
    };

    match tokio::fs::remove_file(&path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Removed profile image");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::InternalError(format!(
            "Failed to remove {}: {e}",
            path.display()
        ))),
    }
}
