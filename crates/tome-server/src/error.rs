//! Error types for the Tome server.

use std::path::PathBuf;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tome_render::RenderError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// IO error.
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Tome core error.
    #[error(transparent)]
    Core(#[from] tome_core::Error),

    /// Rendering error.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

fn core_status(error: &tome_core::Error) -> StatusCode {
    use tome_core::Error;
    match error {
        Error::ModuleNotFound(_) | Error::VersionNotFound { .. } => StatusCode::NOT_FOUND,
        Error::CyclicDependency { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::InvalidModule(_) | Error::UnknownModuleType(_) | Error::UnknownFormat(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::Io(_) | Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Core(e) | ServerError::Render(RenderError::Core(e)) => core_status(e),
            ServerError::Render(_) => StatusCode::BAD_GATEWAY,
            ServerError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn cycle_path(&self) -> Option<&[String]> {
        match self {
            ServerError::Core(e) | ServerError::Render(RenderError::Core(e)) => e.cycle_path(),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        let body = match self.cycle_path() {
            Some(path) => json!({ "error": self.to_string(), "path": path }),
            None => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
