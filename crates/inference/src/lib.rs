//! Model-backed predictors for the SeedSync API.
//!
//! Each predictor wraps an ONNX artifact loaded once with `tract-onnx` and
//! is exposed behind a small trait so request handlers can hold it as
//! `Arc<dyn ...>`. Plans are immutable after loading and safe to share
//! across threads. Running one is CPU-bound, so callers should do it off
//! the async executor.

pub mod artifact;
mod decode;
pub mod error;
pub mod regressor;
pub mod tabular;
pub mod vision;

use seedsync_core::crop_yield::YieldInput;

pub use error::InferenceError;
pub use regressor::OnnxYieldRegressor;
pub use tabular::OnnxClassifier;
pub use vision::OnnxImageClassifier;

/// Winning class of a classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    pub index: usize,
    pub label: String,
    /// Probability of the winning class, in `0.0..=1.0`.
    pub confidence: f32,
}

/// Classifier over a numeric feature vector.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &[f32]) -> Result<ClassPrediction, InferenceError>;
}

/// Classifier over encoded image bytes (PNG, JPEG or WebP).
pub trait ImageClassifier: Send + Sync {
    fn classify_image(&self, bytes: &[u8]) -> Result<ClassPrediction, InferenceError>;
}

/// Yield regressor returning quintals/hectare.
pub trait YieldRegressor: Send + Sync {
    fn predict(&self, input: &YieldInput) -> Result<f64, InferenceError>;
}
