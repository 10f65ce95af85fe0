//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and the single
//! place where errors become HTTP responses. Handlers return `ApiError` and
//! never build status codes themselves; user-facing messages keep the
//! Portuguese wording the mobile client already displays.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::config::ConfigError;
use receita_core::ports::PortError;

/// Why an access token was rejected. All variants answer with 401; the
/// wire message distinguishes only expiry, the one case the mobile client
/// singles out to prompt a re-login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no bearer token supplied")]
    MissingToken,
    #[error("token expired")]
    TokenExpired,
    #[error("token signature or structure invalid")]
    InvalidToken,
    /// The token verifies but its user id no longer resolves. Reported to
    /// the client with the same wording as an invalid token.
    #[error("token subject no longer exists")]
    UnknownUser,
}

impl AuthError {
    fn wire_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Token é obrigatório",
            AuthError::TokenExpired => "Token expirado",
            AuthError::InvalidToken | AuthError::UnknownUser => "Token inválido",
        }
    }
}

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed input. Carries the exact client-facing message.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Login with a wrong email/password pair. Deliberately indistinguishable
    /// between "no such user" and "wrong password".
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The push gateway answered with a failure or was unreachable.
    #[error("{0}")]
    Gateway(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The body shape of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::Auth(e) => (StatusCode::UNAUTHORIZED, e.wire_message().to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Credenciais inválidas".to_string())
            }
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            ApiError::Gateway(m) => (StatusCode::BAD_GATEWAY, m.clone()),
            ApiError::Port(e) => match e {
                PortError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
                PortError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
                PortError::Gateway(m) => (StatusCode::BAD_GATEWAY, m.clone()),
                PortError::Unexpected(m) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, format!("Erro interno: {m}"))
                }
            },
            ApiError::Internal(m) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Erro interno: {m}"))
            }
            ApiError::Config(_) | ApiError::Database(_) | ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro interno: {self}"),
            ),
        };

        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        (status, Json(ErrorBody { message })).into_response()
    }
}
