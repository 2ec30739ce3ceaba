use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::views;

/// Application-level error type for HTTP handlers.
///
/// Recoverable outcomes (schema failures, duplicate email, bad credentials)
/// never reach this type: handlers re-render those at 200 with a notice.
/// `AppError` covers the paths that end the request with an error page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request carried data the server refuses to act on, e.g. an
    /// open-redirect `next` target. Rendered as the 400 page.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(reason) => {
                tracing::warn!(%reason, "rejecting request");
                (StatusCode::BAD_REQUEST, views::bad_request_page()).into_response()
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, views::server_error_page()).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, views::server_error_page()).into_response()
            }
        }
    }
}
