//! REST client for the Google Generative Language API.

use async_trait::async_trait;

use crate::config::GeminiConfig;
use crate::error::GenerationError;
use crate::response::{GenerateContentRequest, GenerateContentResponse};
use crate::retry::{next_delay, RetryConfig};
use crate::TextGenerator;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for one generative model.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
    retry: RetryConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        let retry = RetryConfig {
            max_retries: config.max_retries,
            ..Default::default()
        };
        Self {
            client,
            config,
            retry,
        }
    }

    /// Override the backoff schedule.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// One request/response exchange, bounded by the configured timeout.
    async fn generate_once(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let exchange = async {
            let response = self
                .client
                .post(self.endpoint())
                .header(API_KEY_HEADER, api_key)
                .json(&GenerateContentRequest::text(prompt))
                .send()
                .await?;
            let response = Self::ensure_success(response).await?;
            Ok::<_, GenerationError>(response.json::<GenerateContentResponse>().await?)
        };

        let parsed = tokio::time::timeout(self.config.request_timeout, exchange)
            .await
            .map_err(|_| GenerationError::Timeout(self.config.request_timeout))??;

        parsed.into_text()
    }

    /// Return the response unchanged on success, or an
    /// [`GenerationError::Api`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let mut delay = self.retry.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.generate_once(api_key, prompt).await {
                Ok(text) => {
                    tracing::debug!(
                        model = %self.config.model,
                        attempt,
                        response_len = text.len(),
                        "Generation succeeded",
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt <= self.retry.max_retries => {
                    tracing::warn!(
                        model = %self.config.model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Generation attempt failed, retrying",
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay, &self.retry);
                }
                Err(e) => {
                    tracing::error!(
                        model = %self.config.model,
                        attempt,
                        error = %e,
                        "Generation failed",
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    /// Scripted upstream: answers the n-th call with `script[n]`, repeating
    /// the last entry once the script runs out.
    #[derive(Clone)]
    struct Upstream {
        calls: Arc<AtomicUsize>,
        script: Arc<Vec<(StatusCode, Value)>>,
        delay: Duration,
    }

    async fn generate_content(
        State(upstream): State<Upstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let n = upstream.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(headers[API_KEY_HEADER], "test-key");
        assert!(body["contents"][0]["parts"][0]["text"].is_string());
        tokio::time::sleep(upstream.delay).await;
        let (status, reply) = upstream.script[n.min(upstream.script.len() - 1)].clone();
        (status, Json(reply))
    }

    async fn spawn_upstream(
        script: Vec<(StatusCode, Value)>,
        delay: Duration,
    ) -> (SocketAddr, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let upstream = Upstream {
            calls: Arc::clone(&calls),
            script: Arc::new(script),
            delay,
        };
        let app = Router::new()
            .route("/v1beta/models/{call}", post(generate_content))
            .with_state(upstream);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, calls)
    }

    fn client(addr: SocketAddr, max_retries: u32, timeout: Duration) -> GeminiClient {
        let config = GeminiConfig {
            api_key: Some("test-key".into()),
            model: "gemini-test".into(),
            api_url: format!("http://{addr}/v1beta"),
            request_timeout: timeout,
            max_retries,
        };
        GeminiClient::new(config).with_retry(RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(5),
            ..Default::default()
        })
    }

    fn text_reply(text: &str) -> (StatusCode, Value) {
        (
            StatusCode::OK,
            json!({"candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]}),
        )
    }

    #[tokio::test]
    async fn returns_candidate_text() {
        let (addr, calls) = spawn_upstream(vec![text_reply("NEXT CROP: Gram")], Duration::ZERO).await;
        let text = client(addr, 1, Duration::from_secs(5))
            .generate("prompt")
            .await
            .unwrap();
        assert_eq!(text, "NEXT CROP: Gram");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_error_once() {
        let script = vec![
            (StatusCode::SERVICE_UNAVAILABLE, json!({"error": "overloaded"})),
            text_reply("ok"),
        ];
        let (addr, calls) = spawn_upstream(script, Duration::ZERO).await;
        let text = client(addr, 1, Duration::from_secs(5))
            .generate("prompt")
            .await
            .unwrap();
        assert_eq!(text, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_budget_is_bounded() {
        let script = vec![(StatusCode::TOO_MANY_REQUESTS, json!({"error": "quota"}))];
        let (addr, calls) = spawn_upstream(script, Duration::ZERO).await;
        let result = client(addr, 2, Duration::from_secs(5)).generate("prompt").await;
        assert_matches!(result, Err(GenerationError::Api { status: 429, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let script = vec![(StatusCode::BAD_REQUEST, json!({"error": "bad prompt"}))];
        let (addr, calls) = spawn_upstream(script, Duration::ZERO).await;
        let result = client(addr, 3, Duration::from_secs(5)).generate("prompt").await;
        assert_matches!(result, Err(GenerationError::Api { status: 400, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let (addr, _calls) =
            spawn_upstream(vec![text_reply("late")], Duration::from_millis(500)).await;
        let result = client(addr, 0, Duration::from_millis(50)).generate("prompt").await;
        assert_matches!(result, Err(GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn blocked_prompt_is_reported() {
        let script = vec![(
            StatusCode::OK,
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        )];
        let (addr, calls) = spawn_upstream(script, Duration::ZERO).await;
        let result = client(addr, 2, Duration::from_secs(5)).generate("prompt").await;
        assert_matches!(result, Err(GenerationError::Blocked(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_calling() {
        let config = GeminiConfig {
            api_key: None,
            model: "gemini-test".into(),
            api_url: "http://127.0.0.1:9/v1beta".into(),
            request_timeout: Duration::from_secs(1),
            max_retries: 1,
        };
        let result = GeminiClient::new(config).generate("prompt").await;
        assert_matches!(result, Err(GenerationError::MissingApiKey));
    }
}
