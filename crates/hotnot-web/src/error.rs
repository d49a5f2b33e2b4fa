//! Error types for the web front end.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hotnot_board::BoardError;
use thiserror::Error;
use tracing::error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum WebError {
    /// Board error.
    #[error("board error: {0}")]
    Board(#[from] BoardError),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Board(BoardError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Board(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            Self::Board(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
