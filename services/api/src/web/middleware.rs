//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use receita_core::domain::Role;

use crate::error::{ApiError, AuthError};
use crate::web::state::AppState;

/// The authenticated caller, resolved by [`require_auth`] and stored in
/// request extensions for handlers to read.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

/// Middleware that validates the bearer token and resolves the caller.
///
/// The role comes from the user's row, not from the token, so a stale
/// token never grants a role the user no longer holds.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the Authorization header. An empty value reads as absent.
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if header_value.is_empty() {
        return Err(AuthError::MissingToken.into());
    }

    // 2. Accept both "Bearer <token>" and a bare token.
    let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

    // 3. Verify signature and expiry.
    let claims = state.tokens.verify(token)?;

    // 4. The user behind the token must still exist.
    let user = state
        .db
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    // 5. Hand the caller to the handler.
    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        role: user.role,
    });
    Ok(next.run(req).await)
}
