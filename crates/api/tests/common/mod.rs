#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use seedsync_api::config::ServerConfig;
use seedsync_api::router::build_app_router;
use seedsync_api::state::AppState;
use seedsync_core::crop_yield::{FallbackEstimator, YieldInput};
use seedsync_core::profile::InMemoryProfileStore;
use seedsync_core::schemes::SchemeCatalogue;
use seedsync_genai::{GenerationError, TextGenerator};
use seedsync_inference::{
    ClassPrediction, Classifier, ImageClassifier, InferenceError, YieldRegressor,
};

pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

const MULTIPART_BOUNDARY: &str = "seedsync-test-boundary";

/// Small catalogue used by the scheme listing tests.
pub const SCHEMES_FIXTURE: &str = r#"[
  {"id": "pm-kisan", "name": "PM-KISAN", "description": "Income support of Rs 6000 per year",
   "type": "Income Support", "coverage": "All India", "crop_types": ["All"],
   "website": "https://pmkisan.gov.in"},
  {"id": "pmfby", "name": "Pradhan Mantri Fasal Bima Yojana", "description": "Crop insurance against yield loss",
   "type": "Insurance", "coverage": "All India", "crop_types": ["Rice", "Wheat", "Cotton"]},
  {"id": "rythu-bandhu", "name": "Rythu Bandhu", "description": "Investment support for farmers",
   "type": "Income Support", "coverage": "Telangana", "crop_types": ["Rice", "Maize"]},
  {"id": "kalia", "name": "KALIA", "description": "Livelihood support for small farmers",
   "type": "Income Support", "coverage": "Odisha", "crop_types": ["Rice"]}
]"#;

// ---------------------------------------------------------------------------
// Stub predictors
// ---------------------------------------------------------------------------

/// Tabular classifier that checks the feature count and returns a fixed label.
pub struct StubClassifier {
    pub width: usize,
    pub label: &'static str,
    pub confidence: f32,
}

impl Classifier for StubClassifier {
    fn classify(&self, features: &[f32]) -> Result<ClassPrediction, InferenceError> {
        if features.len() != self.width {
            return Err(InferenceError::InvalidInput(format!(
                "expected {} features, got {}",
                self.width,
                features.len()
            )));
        }
        Ok(ClassPrediction {
            index: 0,
            label: self.label.to_string(),
            confidence: self.confidence,
        })
    }
}

/// Image classifier that accepts anything starting with the PNG signature.
pub struct StubImageClassifier {
    pub label: &'static str,
    pub confidence: f32,
}

impl ImageClassifier for StubImageClassifier {
    fn classify_image(&self, bytes: &[u8]) -> Result<ClassPrediction, InferenceError> {
        if !bytes.starts_with(PNG_MAGIC) {
            return Err(InferenceError::InvalidImage(
                "unsupported image format".to_string(),
            ));
        }
        Ok(ClassPrediction {
            index: 3,
            label: self.label.to_string(),
            confidence: self.confidence,
        })
    }
}

pub struct StubRegressor {
    pub value: f64,
}

impl YieldRegressor for StubRegressor {
    fn predict(&self, _input: &YieldInput) -> Result<f64, InferenceError> {
        Ok(self.value)
    }
}

/// Text generator that replays a fixed reply and records every prompt.
pub struct StubGenerator {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the upstream blocked the prompt.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| GenerationError::Blocked("SAFETY".to_string()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults, writing uploads under
/// `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        body_limit_bytes: 10 * 1024 * 1024,
        model_dir: "models".into(),
        schemes_path: "data/schemes.json".into(),
        upload_dir: upload_dir.to_path_buf(),
        max_image_bytes: 1024,
        yield_fallback_seed: Some(42),
    }
}

/// State with stub predictors, the scheme fixture and no trained yield model.
pub fn test_state(upload_dir: &Path, generator: Arc<StubGenerator>) -> AppState {
    let config = test_config(upload_dir);
    AppState {
        yield_fallback: FallbackEstimator::new(config.yield_fallback_seed),
        config: Arc::new(config),
        crop_classifier: Arc::new(StubClassifier {
            width: 7,
            label: "rice",
            confidence: 0.91,
        }),
        fertilizer_classifier: Arc::new(StubClassifier {
            width: 8,
            label: "Urea",
            confidence: 0.87,
        }),
        disease_classifier: Arc::new(StubImageClassifier {
            label: "Potato___Late_blight",
            confidence: 0.75,
        }),
        yield_regressor: None,
        text_generator: generator,
        schemes: Arc::new(
            SchemeCatalogue::from_json(SCHEMES_FIXTURE).expect("fixture catalogue is valid"),
        ),
        profiles: Arc::new(InMemoryProfileStore::new()),
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_app_router(state, &config)
}

/// Shorthand for an app whose generator always replies with `reply`.
pub fn build_test_app(upload_dir: &Path, reply: &str) -> Router {
    build_app(test_state(upload_dir, Arc::new(StubGenerator::replying(reply))))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body).await
}

/// POST a multipart form holding a single file field.
pub async fn post_file(
    app: Router,
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Response {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A PNG-signed payload padded to `len` bytes.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut data = PNG_MAGIC.to_vec();
    data.resize(len.max(PNG_MAGIC.len()), 0);
    data
}
