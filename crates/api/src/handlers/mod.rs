pub mod crop;
pub mod disease;
pub mod fertilizer;
pub mod pest;
pub mod profile;
pub mod rotation;
pub mod schemes;
pub mod yield_prediction;

use seedsync_inference::InferenceError;

use crate::error::{AppError, AppResult};

/// Run a model call on the blocking thread pool.
pub(crate) async fn run_model<T, F>(call: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, InferenceError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| AppError::InternalError(format!("Inference task failed: {e}")))?;
    Ok(result?)
}
