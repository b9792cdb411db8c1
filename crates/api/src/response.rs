//! Shared response envelope types for API handlers.

use seedsync_core::profile::Profile;
use serde::Serialize;

/// `{ "success", "message", "data" }` envelope used by the profile endpoints.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Profile,
}

impl ProfileResponse {
    pub fn ok(message: &'static str, data: Profile) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

/// Outcome of a profile image upload or removal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// `{ "message": ... }` body for informational endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
