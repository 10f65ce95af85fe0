//! services/api/src/web/catalog.rs
//!
//! The medication and pharmacy catalog. Listing and creating entries is
//! open to every authenticated user regardless of role.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use receita_core::domain::{Medication, NewMedication, NewPharmacy, Pharmacy};

use crate::error::{ApiError, ErrorBody};
use crate::web::extract::Json;
use crate::web::state::AppState;
use crate::web::validate::required;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateMedicationRequest {
    pub nome: Option<String>,
    pub principio_ativo: Option<String>,
    pub fabricante: Option<String>,
    pub codigo_barras: Option<String>,
    pub prescricao_obrigatoria: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct MedicationDto {
    pub id_medicamento: i64,
    pub nome: String,
    pub principio_ativo: String,
    pub fabricante: String,
    pub codigo_barras: Option<String>,
    pub prescricao_obrigatoria: bool,
}

impl From<Medication> for MedicationDto {
    fn from(medication: Medication) -> Self {
        Self {
            id_medicamento: medication.id,
            nome: medication.name,
            principio_ativo: medication.active_ingredient,
            fabricante: medication.manufacturer,
            codigo_barras: medication.barcode,
            prescricao_obrigatoria: medication.prescription_required,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CreateMedicationResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePharmacyRequest {
    pub cnpj: Option<String>,
    pub nome_fantasia: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub responsavel_tecnico: Option<String>,
    /// A JSON number or a numeric string.
    #[schema(value_type = Option<f64>)]
    pub latitude: Option<serde_json::Value>,
    /// A JSON number or a numeric string.
    #[schema(value_type = Option<f64>)]
    pub longitude: Option<serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
pub struct PharmacyDto {
    pub id_farmacia: i64,
    pub cnpj: String,
    pub nome_fantasia: String,
    pub endereco: String,
    pub telefone: Option<String>,
    pub responsavel_tecnico: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Pharmacy> for PharmacyDto {
    fn from(pharmacy: Pharmacy) -> Self {
        Self {
            id_farmacia: pharmacy.id,
            cnpj: pharmacy.tax_id,
            nome_fantasia: pharmacy.trade_name,
            endereco: pharmacy.address,
            telefone: pharmacy.phone,
            responsavel_tecnico: pharmacy.technical_responsible,
            latitude: pharmacy.latitude,
            longitude: pharmacy.longitude,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, ToSchema)]
pub struct CreatePharmacyResponse {
    pub message: String,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordenadas: Option<Coordinates>,
}

/// Parses an optional coordinate that may arrive as a JSON number or a
/// numeric string. `label` leads the error messages, capitalized.
fn parse_coordinate(
    value: Option<&serde_json::Value>,
    label: &str,
    min: f64,
    max: f64,
) -> Result<Option<f64>, ApiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(parsed) = parsed else {
        return Err(ApiError::Validation(format!(
            "{label} deve ser um número válido"
        )));
    };
    if !(min..=max).contains(&parsed) {
        return Err(ApiError::Validation(format!(
            "{label} deve estar entre {min} e {max}"
        )));
    }
    Ok(Some(parsed))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /medicamentos - The medication catalog, ordered by name
#[utoipa::path(
    get,
    path = "/medicamentos",
    responses(
        (status = 200, description = "All medications ordered by name", body = [MedicationDto]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_medications_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows: Vec<MedicationDto> = state
        .db
        .list_medications()
        .await?
        .into_iter()
        .map(MedicationDto::from)
        .collect();
    Ok(Json(rows))
}

/// POST /medicamentos - Add a medication to the catalog
#[utoipa::path(
    post,
    path = "/medicamentos",
    request_body = CreateMedicationRequest,
    responses(
        (status = 201, description = "Medication created", body = CreateMedicationResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_medication_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMedicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let nome = required(&req.nome, "nome")?;
    let principio_ativo = required(&req.principio_ativo, "principio_ativo")?;
    let fabricante = required(&req.fabricante, "fabricante")?;

    let new_medication = NewMedication {
        name: nome.to_string(),
        active_ingredient: principio_ativo.to_string(),
        manufacturer: fabricante.to_string(),
        barcode: req.codigo_barras.clone(),
        prescription_required: req.prescricao_obrigatoria.unwrap_or(false),
    };
    let id = state.db.create_medication(&new_medication).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMedicationResponse {
            message: "Medicamento criado com sucesso".to_string(),
            id,
        }),
    ))
}

/// GET /farmacias - The pharmacy catalog, ordered by trade name
#[utoipa::path(
    get,
    path = "/farmacias",
    responses(
        (status = 200, description = "All pharmacies ordered by trade name", body = [PharmacyDto]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_pharmacies_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows: Vec<PharmacyDto> = state
        .db
        .list_pharmacies()
        .await?
        .into_iter()
        .map(PharmacyDto::from)
        .collect();
    Ok(Json(rows))
}

/// POST /farmacias - Register a pharmacy
#[utoipa::path(
    post,
    path = "/farmacias",
    request_body = CreatePharmacyRequest,
    responses(
        (status = 201, description = "Pharmacy created", body = CreatePharmacyResponse),
        (status = 400, description = "Missing fields or invalid coordinates", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_pharmacy_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePharmacyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cnpj = required(&req.cnpj, "cnpj")?;
    let nome_fantasia = required(&req.nome_fantasia, "nome_fantasia")?;
    let endereco = required(&req.endereco, "endereco")?;

    // Each coordinate is validated on its own; the pairing rule comes last.
    let latitude = parse_coordinate(req.latitude.as_ref(), "Latitude", -90.0, 90.0)?;
    let longitude = parse_coordinate(req.longitude.as_ref(), "Longitude", -180.0, 180.0)?;
    if latitude.is_some() != longitude.is_some() {
        return Err(ApiError::Validation(
            "Latitude e longitude devem ser fornecidas juntas".to_string(),
        ));
    }

    let new_pharmacy = NewPharmacy {
        tax_id: cnpj.to_string(),
        trade_name: nome_fantasia.to_string(),
        address: endereco.to_string(),
        phone: req.telefone.clone(),
        technical_responsible: req.responsavel_tecnico.clone(),
        latitude,
        longitude,
    };
    let id = state.db.create_pharmacy(&new_pharmacy).await?;

    let coordenadas = latitude
        .zip(longitude)
        .map(|(latitude, longitude)| Coordinates {
            latitude,
            longitude,
        });
    Ok((
        StatusCode::CREATED,
        Json(CreatePharmacyResponse {
            message: "Farmácia criada com sucesso".to_string(),
            id,
            coordenadas,
        }),
    ))
}
