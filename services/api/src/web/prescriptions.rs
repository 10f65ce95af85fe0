//! services/api/src/web/prescriptions.rs
//!
//! The prescription lifecycle: creation by physicians, scoped reads,
//! status updates, per-party history, and dashboard statistics.
//!
//! Every read goes through the access table in the core crate. A caller
//! whose scope excludes a prescription gets 404, not 403, so the API never
//! confirms that a foreign prescription exists.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use receita_core::access::{decide, Action, Decision, Visibility};
use receita_core::domain::{
    NewPrescription, NewPrescriptionLine, PrescriptionDetail, PrescriptionLineDetail,
    PrescriptionStatus, Role,
};

use crate::adapters::db::{DATETIME_FORMAT, DATE_FORMAT};
use crate::error::{ApiError, ErrorBody};
use crate::web::extract::Json;
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;
use crate::web::validate::{missing_field, required, required_id};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreatePrescriptionRequest {
    pub id_paciente: Option<i64>,
    pub medicamentos: Option<Vec<LineRequest>>,
    pub diagnostico: Option<String>,
    pub observacoes_gerais: Option<String>,
    /// Validity window in days, 30 when omitted.
    pub validade_dias: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
pub struct LineRequest {
    pub id_medicamento: Option<i64>,
    pub dosagem: Option<String>,
    pub quantidade: Option<i64>,
    pub posologia: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CreatePrescriptionResponse {
    pub message: String,
    pub id_receita: i64,
    pub data_emissao: String,
    pub data_validade: String,
    pub total_medicamentos: usize,
}

#[derive(Serialize, ToSchema)]
pub struct LineDto {
    pub id_medicamento: i64,
    pub dosagem: String,
    pub quantidade: i64,
    pub posologia: String,
    pub observacoes: Option<String>,
    pub nome: String,
    pub principio_ativo: String,
    pub fabricante: String,
}

impl From<PrescriptionLineDetail> for LineDto {
    fn from(line: PrescriptionLineDetail) -> Self {
        Self {
            id_medicamento: line.medication_id,
            dosagem: line.dosage,
            quantidade: line.quantity,
            posologia: line.schedule,
            observacoes: line.notes,
            nome: line.medication_name,
            principio_ativo: line.active_ingredient,
            fabricante: line.manufacturer,
        }
    }
}

/// A prescription as every read endpoint returns it: both parties named,
/// lines joined with the catalog, and the printable number.
#[derive(Serialize, ToSchema)]
pub struct PrescriptionDto {
    pub id_receita: i64,
    pub id_medico: i64,
    pub id_paciente: i64,
    pub data_emissao: String,
    pub data_validade: String,
    pub diagnostico: String,
    pub observacoes: Option<String>,
    pub status: String,
    pub nome_medico: String,
    pub especialidade: String,
    pub crm: String,
    pub nome_paciente: String,
    pub numero: String,
    pub medicamentos: Vec<LineDto>,
}

impl From<PrescriptionDetail> for PrescriptionDto {
    fn from(detail: PrescriptionDetail) -> Self {
        let numero = detail.display_number();
        let PrescriptionDetail {
            prescription,
            physician_name,
            physician_specialty,
            physician_license,
            patient_name,
            lines,
        } = detail;
        Self {
            id_receita: prescription.id,
            id_medico: prescription.physician_id,
            id_paciente: prescription.patient_id,
            data_emissao: prescription.issued_at.format(DATETIME_FORMAT).to_string(),
            data_validade: prescription.expires_at.format(DATE_FORMAT).to_string(),
            diagnostico: prescription.diagnosis,
            observacoes: prescription.notes,
            status: prescription.status.as_wire().to_string(),
            nome_medico: physician_name,
            especialidade: physician_specialty,
            crm: physician_license,
            nome_paciente: patient_name,
            numero,
            medicamentos: lines.into_iter().map(LineDto::from).collect(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub novo_status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum StatsResponse {
    Patient {
        total_receitas: i64,
        receitas_ativas: i64,
        receitas_utilizadas: i64,
    },
    Physician {
        total_receitas_prescritas: i64,
        receitas_ativas: i64,
        pacientes_atendidos: i64,
    },
    Admin {
        total_receitas: i64,
        total_usuarios: i64,
        total_medicamentos: i64,
        total_farmacias: i64,
    },
}

//=========================================================================================
// Validation Helpers
//=========================================================================================

fn missing_line_field(field: &str, position: usize) -> ApiError {
    ApiError::Validation(format!(
        "Campo {field} é obrigatório no medicamento {position}"
    ))
}

fn required_line<'a>(
    value: &'a Option<String>,
    field: &str,
    position: usize,
) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(missing_line_field(field, position)),
    }
}

fn required_line_id(value: Option<i64>, field: &str, position: usize) -> Result<i64, ApiError> {
    match value {
        Some(v) if v != 0 => Ok(v),
        _ => Err(missing_line_field(field, position)),
    }
}

/// The caller's visibility for an action, or `denial` for roles the action
/// is closed to entirely.
fn visibility_for(
    caller: CurrentUser,
    action: Action,
    denial: &str,
) -> Result<Visibility, ApiError> {
    match decide(caller.role, action) {
        Decision::Allowed => Ok(Visibility::Unrestricted),
        Decision::Scoped(scope) => Ok(scope.bind(caller.id)),
        Decision::Forbidden => Err(ApiError::Forbidden(denial.to_string())),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /receitas - Issue a prescription, physicians only
#[utoipa::path(
    post,
    path = "/receitas",
    request_body = CreatePrescriptionRequest,
    responses(
        (status = 201, description = "Prescription created", body = CreatePrescriptionResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not a physician", body = ErrorBody),
        (status = 404, description = "Unknown patient or medication", body = ErrorBody)
    )
)]
pub async fn create_prescription_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Json(req): Json<CreatePrescriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Only physicians prescribe; the check precedes field validation.
    if decide(caller.role, Action::CreatePrescription) != Decision::Allowed {
        return Err(ApiError::Forbidden(
            "Apenas médicos podem criar receitas".to_string(),
        ));
    }

    // 2. Top-level required fields, in order. An empty line list reads the
    //    same as a missing one.
    let patient_id = required_id(req.id_paciente, "id_paciente")?;
    let lines = match &req.medicamentos {
        Some(lines) if !lines.is_empty() => lines,
        _ => return Err(missing_field("medicamentos")),
    };
    let diagnostico = required(&req.diagnostico, "diagnostico")?;

    if !state.db.patient_exists(patient_id).await? {
        return Err(ApiError::NotFound("Paciente não encontrado".to_string()));
    }

    // 3. Validate each line fully, then resolve its medication, before
    //    looking at the next line. Positions are 1-based in messages.
    let mut new_lines = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let position = index + 1;
        let medication_id = required_line_id(line.id_medicamento, "id_medicamento", position)?;
        let dosagem = required_line(&line.dosagem, "dosagem", position)?;
        let quantidade = required_line_id(line.quantidade, "quantidade", position)?;
        let posologia = required_line(&line.posologia, "posologia", position)?;

        if !state.db.medication_exists(medication_id).await? {
            return Err(ApiError::NotFound(format!(
                "Medicamento {medication_id} não encontrado"
            )));
        }

        new_lines.push(NewPrescriptionLine {
            medication_id,
            dosage: dosagem.to_string(),
            quantity: quantidade,
            schedule: posologia.to_string(),
            notes: line.observacoes.clone(),
        });
    }

    // 4. Stamp the validity window and insert everything in one transaction.
    //    Day counts past chrono's date range fail the checked arithmetic.
    let issued_at = Utc::now();
    let validity_days = req.validade_dias.unwrap_or(30);
    let expires_at = Duration::try_days(validity_days)
        .and_then(|window| issued_at.checked_add_signed(window))
        .ok_or_else(|| {
            ApiError::Internal("data de validade fora do intervalo suportado".to_string())
        })?
        .date_naive();

    let new_prescription = NewPrescription {
        physician_id: caller.id,
        patient_id,
        issued_at,
        expires_at,
        diagnosis: diagnostico.to_string(),
        notes: req.observacoes_gerais.clone(),
        lines: new_lines,
    };
    let receipt = state.db.create_prescription(&new_prescription).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePrescriptionResponse {
            message: "Receita criada com sucesso".to_string(),
            id_receita: receipt.id,
            data_emissao: receipt.issued_at.format(DATETIME_FORMAT).to_string(),
            data_validade: receipt.expires_at.format(DATE_FORMAT).to_string(),
            total_medicamentos: receipt.line_count,
        }),
    ))
}

/// GET /receitas - Every prescription within the caller's scope, newest first
#[utoipa::path(
    get,
    path = "/receitas",
    responses(
        (status = 200, description = "Prescriptions visible to the caller", body = [PrescriptionDto]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_prescriptions_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let visibility = visibility_for(caller, Action::ListPrescriptions, "Acesso negado")?;
    let rows: Vec<PrescriptionDto> = state
        .db
        .list_prescriptions(visibility)
        .await?
        .into_iter()
        .map(PrescriptionDto::from)
        .collect();
    Ok(Json(rows))
}

/// GET /receitas/{id} - One prescription, if the caller's scope covers it
#[utoipa::path(
    get,
    path = "/receitas/{id}",
    params(("id" = i64, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "The prescription", body = PrescriptionDto),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Not found or outside the caller's scope", body = ErrorBody)
    )
)]
pub async fn get_prescription_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(prescription_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let visibility = visibility_for(caller, Action::ReadPrescription, "Acesso negado")?;
    let detail = state
        .db
        .load_prescription(prescription_id, visibility)
        .await?
        .ok_or_else(|| ApiError::NotFound("Receita não encontrada".to_string()))?;
    Ok(Json(PrescriptionDto::from(detail)))
}

/// PUT /receitas/{id}/status - Move a prescription to a new status
#[utoipa::path(
    put,
    path = "/receitas/{id}/status",
    params(("id" = i64, Path, description = "Prescription id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateStatusResponse),
        (status = 400, description = "Missing or unknown status", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Patients cannot change statuses", body = ErrorBody),
        (status = 404, description = "Not found or outside the caller's scope", body = ErrorBody)
    )
)]
pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(prescription_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_status = required(&req.status, "status")?;
    let status = PrescriptionStatus::from_wire(raw_status).ok_or_else(|| {
        ApiError::Validation(format!(
            "Status deve ser um de: {}",
            PrescriptionStatus::WIRE_VALUES.join(", ")
        ))
    })?;

    let visibility = visibility_for(
        caller,
        Action::UpdatePrescriptionStatus,
        "Pacientes não podem alterar status de receitas",
    )?;

    // Transitions are unguarded on purpose; the client re-activates
    // cancelled prescriptions.
    let updated = state
        .db
        .update_prescription_status(prescription_id, status, visibility)
        .await?
        .ok_or_else(|| ApiError::NotFound("Receita não encontrada ou sem permissão".to_string()))?;

    Ok(Json(UpdateStatusResponse {
        message: "Status da receita atualizado com sucesso".to_string(),
        novo_status: updated.status.as_wire().to_string(),
    }))
}

/// GET /receitas/paciente/{id_paciente} - A patient's history, for clinicians
#[utoipa::path(
    get,
    path = "/receitas/paciente/{id_paciente}",
    params(("id_paciente" = i64, Path, description = "Patient user id")),
    responses(
        (status = 200, description = "The patient's prescriptions, newest first", body = [PrescriptionDto]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is a patient", body = ErrorBody)
    )
)]
pub async fn list_for_patient_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(patient_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if decide(caller.role, Action::ListPatientHistory) != Decision::Allowed {
        return Err(ApiError::Forbidden("Acesso negado".to_string()));
    }

    let rows: Vec<PrescriptionDto> = state
        .db
        .list_prescriptions(Visibility::ForPatient(patient_id))
        .await?
        .into_iter()
        .map(PrescriptionDto::from)
        .collect();
    Ok(Json(rows))
}

/// GET /receitas/medico/{id_medico} - A physician's output, admin only
#[utoipa::path(
    get,
    path = "/receitas/medico/{id_medico}",
    params(("id_medico" = i64, Path, description = "Physician user id")),
    responses(
        (status = 200, description = "The physician's prescriptions, newest first", body = [PrescriptionDto]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    )
)]
pub async fn list_for_physician_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(physician_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if decide(caller.role, Action::ListPhysicianHistory) != Decision::Allowed {
        return Err(ApiError::Forbidden("Acesso negado".to_string()));
    }

    let rows: Vec<PrescriptionDto> = state
        .db
        .list_prescriptions(Visibility::ForPhysician(physician_id))
        .await?
        .into_iter()
        .map(PrescriptionDto::from)
        .collect();
    Ok(Json(rows))
}

/// GET /receitas/stats - Role-shaped dashboard counters
#[utoipa::path(
    get,
    path = "/receitas/stats",
    responses(
        (status = 200, description = "Counters matching the caller's role", body = StatsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let response = match caller.role {
        Role::Patient => {
            let stats = state.db.patient_stats(caller.id).await?;
            StatsResponse::Patient {
                total_receitas: stats.total,
                receitas_ativas: stats.active,
                receitas_utilizadas: stats.used,
            }
        }
        Role::Physician => {
            let stats = state.db.physician_stats(caller.id).await?;
            StatsResponse::Physician {
                total_receitas_prescritas: stats.total_prescribed,
                receitas_ativas: stats.active,
                pacientes_atendidos: stats.patients_treated,
            }
        }
        Role::Admin => {
            let stats = state.db.admin_stats().await?;
            StatsResponse::Admin {
                total_receitas: stats.total_prescriptions,
                total_usuarios: stats.total_users,
                total_medicamentos: stats.total_medications,
                total_farmacias: stats.total_pharmacies,
            }
        }
    };
    Ok(Json(response))
}
