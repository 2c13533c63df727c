//! Error type for twin route handlers.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwinError {
    /// Reading or writing the visitor session failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for TwinError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Html(crate::views::error_page(status, &self.to_string()))).into_response()
    }
}

pub type TwinResult<T> = Result<T, TwinError>;
