use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`). Must exceed the
    /// generative-text timeout including retries.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,
    /// Directory holding one subdirectory per model artifact.
    pub model_dir: PathBuf,
    /// Government scheme catalogue (JSON array).
    pub schemes_path: PathBuf,
    /// Root of the statically served upload tree.
    pub upload_dir: PathBuf,
    /// Largest accepted profile image, in bytes.
    pub max_image_bytes: usize,
    /// Fixed seed for the yield fallback estimator. Unset means OS entropy.
    pub yield_fallback_seed: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `90`                       |
    /// | `BODY_LIMIT_MB`        | `10`                       |
    /// | `MODEL_DIR`            | `models`                   |
    /// | `SCHEMES_PATH`         | `data/schemes.json`        |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `MAX_IMAGE_BYTES`      | `5242880`                  |
    /// | `YIELD_FALLBACK_SEED`  | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let body_limit_mb: usize = std::env::var("BODY_LIMIT_MB")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("BODY_LIMIT_MB must be a valid usize");

        let model_dir = std::env::var("MODEL_DIR").unwrap_or_else(|_| "models".into());
        let schemes_path =
            std::env::var("SCHEMES_PATH").unwrap_or_else(|_| "data/schemes.json".into());
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());

        let max_image_bytes: usize = std::env::var("MAX_IMAGE_BYTES")
            .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_IMAGE_BYTES must be a valid usize");

        let yield_fallback_seed: Option<u64> = std::env::var("YIELD_FALLBACK_SEED").ok().map(|s| {
            s.parse()
                .expect("YIELD_FALLBACK_SEED must be a valid u64")
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            body_limit_bytes: body_limit_mb * 1024 * 1024,
            model_dir: model_dir.into(),
            schemes_path: schemes_path.into(),
            upload_dir: upload_dir.into(),
            max_image_bytes,
            yield_fallback_seed,
        }
    }
}
