//! services/api/src/web/users.rs
//!
//! Admin-only user listing.

use axum::{extract::State, response::IntoResponse, Extension};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use receita_core::access::{decide, Action, Decision};

use crate::error::{ApiError, ErrorBody};
use crate::web::extract::Json;
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct UserRow {
    pub id_usuario: i64,
    pub nome: String,
    pub email: String,
    pub tipo: String,
}

/// GET /usuarios - Every registered user, admin only
#[utoipa::path(
    get,
    path = "/usuarios",
    responses(
        (status = 200, description = "All users ordered by name", body = [UserRow]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    if decide(caller.role, Action::ListUsers) != Decision::Allowed {
        return Err(ApiError::Forbidden("Acesso negado".to_string()));
    }

    let rows: Vec<UserRow> = state
        .db
        .list_users()
        .await?
        .into_iter()
        .map(|u| UserRow {
            id_usuario: u.id,
            nome: u.name,
            email: u.email,
            tipo: u.role.as_wire().to_string(),
        })
        .collect();
    Ok(Json(rows))
}
