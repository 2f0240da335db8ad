use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use invitewiz_core::error::CoreError;
use invitewiz_delivery::RelayError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`RelayError`] for delivery
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `invitewiz_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The form relay could not deliver the order.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Submissions are disabled because no relay credentials are configured.
    #[error("Order submission is not configured")]
    RelayNotConfigured,

    /// The session store is full; new sessions are refused until idle ones expire.
    #[error("Too many open order sessions, please try again later")]
    SessionLimitReached,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
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
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Delivery errors ---
            AppError::Relay(err) => {
                tracing::warn!(error = %err, "Order delivery failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "DELIVERY_FAILED",
                    "We could not send your request. Please try again.".to_string(),
                )
            }
            AppError::RelayNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "DELIVERY_UNAVAILABLE",
                self.to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::SessionLimitReached => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_LIMIT_REACHED",
                self.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
