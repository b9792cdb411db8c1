use std::time::Duration;

/// Errors from the generative-text layer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generative text API key is not configured")]
    MissingApiKey,

    /// The HTTP exchange failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    /// The API returned a non-2xx status code.
    #[error("Generative text API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The prompt or the candidate was blocked by safety filtering.
    #[error("Generation was blocked: {0}")]
    Blocked(String),

    /// A 2xx response that carried no candidate text.
    #[error("Generation returned no text (finish reason: {0})")]
    EmptyResponse(String),
}

impl GenerationError {
    /// Transport failures, timeouts, 429 and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_decode(),
            Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || (500..600).contains(status),
            Self::MissingApiKey | Self::Blocked(_) | Self::EmptyResponse(_) => false,
        }
    }
}
