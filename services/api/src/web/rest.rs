//! services/api/src/web/rest.rs
//!
//! Contains the health probe and the master definition for the OpenAPI
//! specification.

use chrono::Utc;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::extract::Json;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::profile_handler,
        crate::web::users::list_users_handler,
        crate::web::catalog::list_medications_handler,
        crate::web::catalog::create_medication_handler,
        crate::web::catalog::list_pharmacies_handler,
        crate::web::catalog::create_pharmacy_handler,
        crate::web::prescriptions::create_prescription_handler,
        crate::web::prescriptions::list_prescriptions_handler,
        crate::web::prescriptions::get_prescription_handler,
        crate::web::prescriptions::update_status_handler,
        crate::web::prescriptions::list_for_patient_handler,
        crate::web::prescriptions::list_for_physician_handler,
        crate::web::prescriptions::stats_handler,
        crate::web::notifications::send_notification_handler,
        crate::web::notifications::register_token_handler,
        health_handler,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::web::auth::RegisterRequest,
        crate::web::auth::RegisterResponse,
        crate::web::auth::LoginRequest,
        crate::web::auth::LoginResponse,
        crate::web::auth::UserSummary,
        crate::web::auth::ProfileResponse,
        crate::web::users::UserRow,
        crate::web::catalog::CreateMedicationRequest,
        crate::web::catalog::MedicationDto,
        crate::web::catalog::CreateMedicationResponse,
        crate::web::catalog::CreatePharmacyRequest,
        crate::web::catalog::PharmacyDto,
        crate::web::catalog::Coordinates,
        crate::web::catalog::CreatePharmacyResponse,
        crate::web::prescriptions::CreatePrescriptionRequest,
        crate::web::prescriptions::LineRequest,
        crate::web::prescriptions::CreatePrescriptionResponse,
        crate::web::prescriptions::LineDto,
        crate::web::prescriptions::PrescriptionDto,
        crate::web::prescriptions::UpdateStatusRequest,
        crate::web::prescriptions::UpdateStatusResponse,
        crate::web::prescriptions::StatsResponse,
        crate::web::notifications::SendNotificationRequest,
        crate::web::notifications::RegisterTokenRequest,
        crate::web::notifications::MessageResponse,
        HealthResponse,
    )),
    tags(
        (name = "Receita Digital API", description = "API endpoints for digital medical prescriptions.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The liveness payload.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET /health - Liveness probe, no authentication
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "API funcionando!".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
