use std::time::Duration;

/// Generative-text settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` leaves the client constructible; every call then fails with
    /// [`GenerationError::MissingApiKey`](crate::GenerationError::MissingApiKey).
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL up to and including the API version segment.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Additional attempts after the first one for retryable failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                                             |
    /// |-----------------------|-----------------------------------------------------|
    /// | `GEMINI_API_KEY`      | `VITE_GEMINI_API_KEY`, else unset                    |
    /// | `GEMINI_MODEL`        | `gemini-1.5-flash`                                  |
    /// | `GEMINI_API_URL`      | `https://generativelanguage.googleapis.com/v1beta`  |
    /// | `GEMINI_TIMEOUT_SECS` | `30`                                                |
    /// | `GEMINI_MAX_RETRIES`  | `1`                                                 |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("VITE_GEMINI_API_KEY"))
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into());

        let api_url = std::env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("GEMINI_TIMEOUT_SECS must be a valid u64");

        let max_retries: u32 = std::env::var("GEMINI_MAX_RETRIES")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("GEMINI_MAX_RETRIES must be a valid u32");

        Self {
            api_key,
            model,
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries,
        }
    }
}
