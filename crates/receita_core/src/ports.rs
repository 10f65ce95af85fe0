//! crates/receita_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or
//! push-notification gateways.

use async_trait::async_trait;

use crate::access::Visibility;
use crate::domain::{
    AdminStats, Medication, NewMedication, NewPharmacy, NewPrescription, NewUser, PatientStats,
    Pharmacy, PhysicianStats, Prescription, PrescriptionDetail, PrescriptionReceipt,
    PrescriptionStatus, Profile, PushMessage, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Upstream gateway failure: {0}")]
    Gateway(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users and Profiles ---
    async fn create_user(&self, new_user: &NewUser) -> PortResult<i64>;

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    async fn find_user_by_id(&self, user_id: i64) -> PortResult<Option<User>>;

    /// The user row joined with its patient or physician profile, if any.
    async fn load_profile(&self, user_id: i64) -> PortResult<Option<Profile>>;

    /// Every user row, ordered by name.
    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn patient_exists(&self, user_id: i64) -> PortResult<bool>;

    // --- Medication and Pharmacy Catalog ---
    async fn create_medication(&self, new_medication: &NewMedication) -> PortResult<i64>;

    async fn list_medications(&self) -> PortResult<Vec<Medication>>;

    async fn medication_exists(&self, medication_id: i64) -> PortResult<bool>;

    async fn create_pharmacy(&self, new_pharmacy: &NewPharmacy) -> PortResult<i64>;

    async fn list_pharmacies(&self) -> PortResult<Vec<Pharmacy>>;

    // --- Prescriptions ---
    /// Inserts the prescription row and all of its lines in one transaction.
    async fn create_prescription(
        &self,
        new_prescription: &NewPrescription,
    ) -> PortResult<PrescriptionReceipt>;

    /// A single prescription with lines, or `None` when it does not exist
    /// or falls outside the given visibility.
    async fn load_prescription(
        &self,
        prescription_id: i64,
        visibility: Visibility,
    ) -> PortResult<Option<PrescriptionDetail>>;

    /// All prescriptions within the given visibility, newest first.
    async fn list_prescriptions(
        &self,
        visibility: Visibility,
    ) -> PortResult<Vec<PrescriptionDetail>>;

    /// Returns the updated row, or `None` when no row matched the id within
    /// the given visibility.
    async fn update_prescription_status(
        &self,
        prescription_id: i64,
        status: PrescriptionStatus,
        visibility: Visibility,
    ) -> PortResult<Option<Prescription>>;

    // --- Dashboard Counters ---
    async fn patient_stats(&self, patient_id: i64) -> PortResult<PatientStats>;

    async fn physician_stats(&self, physician_id: i64) -> PortResult<PhysicianStats>;

    async fn admin_stats(&self) -> PortResult<AdminStats>;
}

#[async_trait]
pub trait PushGatewayService: Send + Sync {
    /// Delivers one push message to the device identified by `message.to`.
    async fn send_push(&self, message: &PushMessage) -> PortResult<()>;
}
