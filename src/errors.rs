use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use serde_json::json;
use std::fmt;

/// Outcome errors of a single address lookup.
///
/// These never abort a batch: each one ends up as the `error` field of the
/// result for the identifier that caused it. The client only ever sees the
/// fixed message, the underlying cause is logged where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// Network, TLS, timeout or non-success HTTP status.
    Transport,
    /// Malformed answer, or a malformed birthdate inside an address.
    Parse,
    /// Well-formed answer without any address element.
    NotFound,
}

impl LookupError {
    /// The user-visible message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            LookupError::Transport => "message could not be retrieved",
            LookupError::Parse => "message could not be translated",
            LookupError::NotFound => "no address found",
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for LookupError {}

impl Serialize for LookupError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Application-level errors raised outside the per-identifier pipeline.
#[derive(Debug)]
pub enum AppError {
    /// Configuration could not be used (e.g. unreadable certificate file).
    Config(String),
    /// The TLS client could not be built from the configured material.
    Tls(String),
    /// The supplied location identifier is empty.
    InvalidIdentifier,
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Tls(msg) => write!(f, "TLS setup error: {}", msg),
            AppError::InvalidIdentifier => write!(f, "Location identifier must not be empty"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            AppError::Config(msg) | AppError::Tls(msg) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
