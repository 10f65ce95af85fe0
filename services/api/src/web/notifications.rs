//! services/api/src/web/notifications.rs
//!
//! Push notification relay. Both endpoints are public: the mobile app
//! calls them before the user has a session.

use axum::{extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use receita_core::domain::PushMessage;

use crate::error::{ApiError, ErrorBody};
use crate::web::extract::Json;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SendNotificationRequest {
    /// The Expo push token of the receiving device.
    pub token: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Opaque payload forwarded to the app unchanged.
    pub data: Option<serde_json::Value>,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterTokenRequest {
    pub token: Option<String>,
    pub platform: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /notifications/send - Relay one push message through Expo
#[utoipa::path(
    post,
    path = "/notifications/send",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Notification delivered", body = MessageResponse),
        (status = 400, description = "Missing token, title or body", body = ErrorBody),
        (status = 502, description = "Expo rejected the message or was unreachable", body = ErrorBody)
    )
)]
pub async fn send_notification_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // All three fields share one error message.
    let (Some(token), Some(title), Some(body)) = (
        req.token.as_deref().filter(|v| !v.is_empty()),
        req.title.as_deref().filter(|v| !v.is_empty()),
        req.body.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::Validation("Dados incompletos".to_string()));
    };

    let message = PushMessage {
        to: token.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        data: req.data.clone().unwrap_or_else(|| serde_json::json!({})),
    };
    if let Err(e) = state.push.send_push(&message).await {
        error!("Push delivery failed: {e}");
        return Err(ApiError::Gateway("Falha ao enviar notificação".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Notificação enviada com sucesso".to_string(),
    }))
}

/// POST /notifications/register - Acknowledge a device's push token
#[utoipa::path(
    post,
    path = "/notifications/register",
    request_body = RegisterTokenRequest,
    responses(
        (status = 200, description = "Token acknowledged", body = MessageResponse),
        (status = 400, description = "Missing token", body = ErrorBody)
    )
)]
pub async fn register_token_handler(
    Json(req): Json<RegisterTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(token) = req.token.as_deref().filter(|v| !v.is_empty()) else {
        return Err(ApiError::Validation("Token não fornecido".to_string()));
    };

    // Tokens are not persisted; the app re-registers on every launch, so
    // acknowledging is enough for the current client flow.
    let prefix: String = token.chars().take(20).collect();
    info!(
        "Push token registered: {}... (plataforma: {})",
        prefix,
        req.platform.as_deref().unwrap_or("unknown")
    );
    Ok(Json(MessageResponse {
        message: "Token registrado com sucesso".to_string(),
    }))
}
