/// Errors raised while loading or running a model artifact.
///
/// `MissingArtifact`, `Load` and `Metadata` occur at startup. `InvalidInput`
/// and `InvalidImage` are caused by the request. The rest are runtime
/// failures of the model itself.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Model artifact not found: {0}")]
    MissingArtifact(String),

    #[error("Failed to load model {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Invalid artifact metadata: {0}")]
    Metadata(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Inference failed: {0}")]
    Execution(String),

    #[error("Predicted class index {index} has no label ({count} labels known)")]
    UnknownClass { index: usize, count: usize },
}

impl InferenceError {
    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidImage(_))
    }
}
