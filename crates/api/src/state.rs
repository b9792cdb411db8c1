use std::sync::Arc;

use seedsync_core::crop_yield::FallbackEstimator;
use seedsync_core::profile::ProfileStore;
use seedsync_core::schemes::SchemeCatalogue;
use seedsync_genai::TextGenerator;
use seedsync_inference::{Classifier, ImageClassifier, YieldRegressor};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
/// Everything except the profile store is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// 7-feature crop recommendation model.
    pub crop_classifier: Arc<dyn Classifier>,
    /// 8-feature fertilizer recommendation model.
    pub fertilizer_classifier: Arc<dyn Classifier>,
    /// Plant disease image model.
    pub disease_classifier: Arc<dyn ImageClassifier>,
    /// Trained yield model; `None` routes every request to `yield_fallback`.
    pub yield_regressor: Option<Arc<dyn YieldRegressor>>,
    pub yield_fallback: FallbackEstimator,
    /// Generative-text backend for the advice endpoints.
    pub text_generator: Arc<dyn TextGenerator>,
    pub schemes: Arc<SchemeCatalogue>,
    pub profiles: Arc<dyn ProfileStore>,
}
