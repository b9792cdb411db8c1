//! User profiles and the store they live in.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use validator::Validate;

use crate::error::CoreError;

/// A user profile. Every field is always present in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub profile_image: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: String::new(),
            location: String::new(),
            profile_image: None,
        }
    }
}

/// Full replacement body for a profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn into_profile(self) -> Profile {
        Profile {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            profile_image: self.profile_image.filter(|url| !url.is_empty()),
        }
    }
}

/// Partial update: only the fields present are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl ProfilePatch {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        if let Some(location) = self.location {
            profile.location = location;
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Key-value storage for profiles, keyed by an opaque user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>, CoreError>;

    /// Replace the record. An incoming profile without an image keeps the
    /// stored image.
    async fn put(&self, user_id: &str, profile: Profile) -> Result<Profile, CoreError>;

    /// Merge `patch` into the stored record, or into the default record if
    /// there is none.
    async fn patch(&self, user_id: &str, patch: ProfilePatch) -> Result<Profile, CoreError>;

    /// Remove the record, returning it if it existed.
    async fn delete(&self, user_id: &str) -> Result<Option<Profile>, CoreError>;

    /// Set or clear the image reference and return the previous one.
    ///
    /// Setting an image on an unknown user creates a default record. Clearing
    /// it on an unknown user is a no-op.
    async fn replace_image(
        &self,
        user_id: &str,
        image: Option<String>,
    ) -> Result<Option<String>, CoreError>;
}

/// Process-local [`ProfileStore`]. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>, CoreError> {
        Ok(self.profiles.lock().await.get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, mut profile: Profile) -> Result<Profile, CoreError> {
        let mut profiles = self.profiles.lock().await;
        if profile.profile_image.is_none() {
            profile.profile_image = profiles
                .get(user_id)
                .and_then(|existing| existing.profile_image.clone());
        }
        profiles.insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn patch(&self, user_id: &str, patch: ProfilePatch) -> Result<Profile, CoreError> {
        let mut profiles = self.profiles.lock().await;
        let profile = profiles.entry(user_id.to_string()).or_default();
        patch.apply(profile);
        Ok(profile.clone())
    }

    async fn delete(&self, user_id: &str) -> Result<Option<Profile>, CoreError> {
        Ok(self.profiles.lock().await.remove(user_id))
    }

    async fn replace_image(
        &self,
        user_id: &str,
        image: Option<String>,
    ) -> Result<Option<String>, CoreError> {
        let mut profiles = self.profiles.lock().await;
        match image {
            Some(url) => {
                let profile = profiles.entry(user_id.to_string()).or_default();
                Ok(profile.profile_image.replace(url))
            }
            None => Ok(profiles
                .get_mut(user_id)
                .and_then(|profile| profile.profile_image.take())),
        }
    }
}
