use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vidshelf_core::error::{CoreError, StoreError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vidshelf_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut stage = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::UnsupportedTransfer(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNSUPPORTED_TRANSFER",
                    msg.clone(),
                ),
                CoreError::Fetch(msg) => {
                    tracing::warn!(error = %msg, "Store unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "FETCH_FAILED",
                        "The video store could not be reached".to_string(),
                    )
                }
                CoreError::TransferFailed { stage: failed_at, cause } => {
                    stage = Some(failed_at.as_str());
                    (
                        StatusCode::BAD_GATEWAY,
                        "TRANSFER_FAILED",
                        format!("Transfer failed at {failed_at}: {cause}"),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(stage) = stage {
            body["stage"] = json!(stage);
        }

        (status, axum::Json(body)).into_response()
    }
}
