use std::net::SocketAddr;
use std::sync::Arc;

use seedsync_core::crop_yield::FallbackEstimator;
use seedsync_core::profile::InMemoryProfileStore;
use seedsync_core::schemes::SchemeCatalogue;
use seedsync_genai::{GeminiClient, GeminiConfig};
use seedsync_inference::{OnnxClassifier, OnnxImageClassifier, OnnxYieldRegressor, YieldRegressor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seedsync_api::config::ServerConfig;
use seedsync_api::router::build_app_router;
use seedsync_api::state::AppState;

/// Feature count of the crop recommendation model.
const CROP_FEATURES: usize = 7;
/// Feature count of the fertilizer recommendation model.
const FERTILIZER_FEATURES: usize = 8;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seedsync_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Models ---
    let model_dir = &config.model_dir;
    let crop_classifier = OnnxClassifier::load(model_dir.join("crop"), CROP_FEATURES)
        .expect("Failed to load crop recommendation model");
    let fertilizer_classifier =
        OnnxClassifier::load(model_dir.join("fertilizer"), FERTILIZER_FEATURES)
            .expect("Failed to load fertilizer recommendation model");
    let disease_classifier = OnnxImageClassifier::load(model_dir.join("disease"))
        .expect("Failed to load plant disease model");
    tracing::info!(dir = %model_dir.display(), "Classification models loaded");

    let yield_regressor: Option<Arc<dyn YieldRegressor>> =
        match OnnxYieldRegressor::load(model_dir.join("yield")) {
            Ok(regressor) => {
                tracing::info!("Yield model loaded");
                Some(Arc::new(regressor))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Yield model unavailable, using fallback estimator");
                None
            }
        };

    // --- Schemes catalogue ---
    let schemes = SchemeCatalogue::load(&config.schemes_path)
        .expect("Failed to load government schemes catalogue");

    // --- Generative text ---
    let gemini_config = GeminiConfig::from_env();
    if gemini_config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, advice endpoints will fail");
    }
    let text_generator = GeminiClient::new(gemini_config);
    tracing::info!(model = text_generator.model(), "Generative text client configured");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        crop_classifier: Arc::new(crop_classifier),
        fertilizer_classifier: Arc::new(fertilizer_classifier),
        disease_classifier: Arc::new(disease_classifier),
        yield_regressor,
        yield_fallback: FallbackEstimator::new(config.yield_fallback_seed),
        text_generator: Arc::new(text_generator),
        schemes: Arc::new(schemes),
        profiles: Arc::new(InMemoryProfileStore::new()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
