//! crates/receita_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format;
//! the HTTP layer speaks the Portuguese field names of the mobile client
//! and translates at the edges.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What a user is allowed to see and do. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "paciente")]
    Patient,
    #[serde(rename = "medico")]
    Physician,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// Wire/storage spelling ("paciente", "medico", "admin").
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Patient => "paciente",
            Role::Physician => "medico",
            Role::Admin => "admin",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "paciente" => Some(Role::Patient),
            "medico" => Some(Role::Physician),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Lifecycle state of a prescription.
///
/// Transitions are unguarded: any authorised caller may set any state from
/// any state. The mobile client depends on re-activating cancelled entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrescriptionStatus {
    #[serde(rename = "ativa")]
    Active,
    #[serde(rename = "utilizada")]
    Used,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[serde(rename = "expirada")]
    Expired,
}

impl PrescriptionStatus {
    /// Wire/storage spellings, in the order quoted by validation messages.
    pub const WIRE_VALUES: [&'static str; 4] = ["ativa", "utilizada", "cancelada", "expirada"];

    pub fn as_wire(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "ativa",
            PrescriptionStatus::Used => "utilizada",
            PrescriptionStatus::Cancelled => "cancelada",
            PrescriptionStatus::Expired => "expirada",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "ativa" => Some(PrescriptionStatus::Active),
            "utilizada" => Some(PrescriptionStatus::Used),
            "cancelada" => Some(PrescriptionStatus::Cancelled),
            "expirada" => Some(PrescriptionStatus::Expired),
            _ => None,
        }
    }
}

/// Zero-padded display number printed on a prescription ("#00000042").
/// Ids with more than eight digits are printed in full, never truncated.
pub fn display_number(id: i64) -> String {
    format!("#{:08}", id)
}

// Represents a user - used throughout the app. Never carries the password.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

/// Patient attributes stored 1:1 with the user row. All optional at
/// registration time.
#[derive(Debug, Clone)]
pub struct PatientProfile {
    pub user_id: i64,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Physician attributes stored 1:1 with the user row. License number and
/// specialty are mandatory at registration.
#[derive(Debug, Clone)]
pub struct PhysicianProfile {
    pub user_id: i64,
    pub license: String,
    pub specialty: String,
}

/// A user row together with whichever role profile exists for it.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub patient: Option<PatientProfile>,
    pub physician: Option<PhysicianProfile>,
}

/// Role-specific attributes supplied at registration. The variant decides
/// the role, so a patient or physician can never be created without its
/// profile row.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    Admin,
    Patient {
        national_id: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    },
    Physician {
        license: String,
        specialty: String,
    },
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Admin => Role::Admin,
            RoleProfile::Patient { .. } => Role::Patient,
            RoleProfile::Physician { .. } => Role::Physician,
        }
    }
}

/// A user about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub profile: RoleProfile,
}

/// Catalog entry for a sellable medication.
#[derive(Debug, Clone)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub active_ingredient: String,
    pub manufacturer: String,
    pub barcode: Option<String>,
    pub prescription_required: bool,
}

#[derive(Debug, Clone)]
pub struct NewMedication {
    pub name: String,
    pub active_ingredient: String,
    pub manufacturer: String,
    pub barcode: Option<String>,
    pub prescription_required: bool,
}

/// Catalog entry for a pharmacy. Latitude and longitude are either both
/// present or both absent; the web layer enforces the ranges.
#[derive(Debug, Clone)]
pub struct Pharmacy {
    pub id: i64,
    pub tax_id: String,
    pub trade_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub technical_responsible: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewPharmacy {
    pub tax_id: String,
    pub trade_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub technical_responsible: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A physician-authored order for one or more medications.
#[derive(Debug, Clone)]
pub struct Prescription {
    pub id: i64,
    pub physician_id: i64,
    pub patient_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: NaiveDate,
    pub diagnosis: String,
    pub notes: Option<String>,
    pub status: PrescriptionStatus,
}

/// One medication entry within a prescription-to-be. Lines are inserted in
/// the same transaction as the prescription row.
#[derive(Debug, Clone)]
pub struct NewPrescriptionLine {
    pub medication_id: i64,
    pub dosage: String,
    pub quantity: i64,
    pub schedule: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub physician_id: i64,
    pub patient_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: NaiveDate,
    pub diagnosis: String,
    pub notes: Option<String>,
    pub lines: Vec<NewPrescriptionLine>,
}

/// What the caller gets back right after creating a prescription.
#[derive(Debug, Clone)]
pub struct PrescriptionReceipt {
    pub id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: NaiveDate,
    pub line_count: usize,
}

/// A prescription line joined with its medication's catalog data.
#[derive(Debug, Clone)]
pub struct PrescriptionLineDetail {
    pub medication_id: i64,
    pub dosage: String,
    pub quantity: i64,
    pub schedule: String,
    pub notes: Option<String>,
    pub medication_name: String,
    pub active_ingredient: String,
    pub manufacturer: String,
}

/// A prescription denormalised for presentation: physician and patient
/// names resolved, lines joined with the medication catalog.
#[derive(Debug, Clone)]
pub struct PrescriptionDetail {
    pub prescription: Prescription,
    pub physician_name: String,
    pub physician_specialty: String,
    pub physician_license: String,
    pub patient_name: String,
    pub lines: Vec<PrescriptionLineDetail>,
}

impl PrescriptionDetail {
    pub fn display_number(&self) -> String {
        display_number(self.prescription.id)
    }
}

/// One push notification addressed to a single device token. `data` is an
/// opaque payload forwarded to the app unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Aggregate counters for a patient's home screen.
#[derive(Debug, Clone, Copy)]
pub struct PatientStats {
    pub total: i64,
    pub active: i64,
    pub used: i64,
}

/// Aggregate counters for a physician's home screen.
#[derive(Debug, Clone, Copy)]
pub struct PhysicianStats {
    pub total_prescribed: i64,
    pub active: i64,
    pub patients_treated: i64,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy)]
pub struct AdminStats {
    pub total_prescriptions: i64,
    pub total_users: i64,
    pub total_medications: i64,
    pub total_pharmacies: i64,
}
