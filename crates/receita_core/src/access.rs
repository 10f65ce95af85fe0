//! crates/receita_core/src/access.rs
//!
//! Role permissions as one pure decision table. Handlers ask `decide` what
//! a role may do and thread the resulting [`Visibility`] into queries, so
//! the rules live here instead of being scattered through the HTTP layer.

use crate::domain::Role;

/// Everything a caller can ask the prescription service to do on their
/// behalf. Catalog writes are open to every authenticated user and are not
/// listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreatePrescription,
    ReadPrescription,
    ListPrescriptions,
    UpdatePrescriptionStatus,
    ListUsers,
    ListPatientHistory,
    ListPhysicianHistory,
}

/// How far a scoped action reaches once bound to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Rows where the caller is the patient.
    OwnAsPatient,
    /// Rows where the caller is the authoring physician.
    Authored,
    /// Every row.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden,
    Scoped(Scope),
}

/// The whole permission model. A row that falls outside a caller's scope
/// reads as absent, not as forbidden; `Forbidden` is reserved for actions
/// a role may never perform at all.
pub fn decide(role: Role, action: Action) -> Decision {
    use Action::*;
    use Decision::*;
    match (role, action) {
        (Role::Physician, CreatePrescription) => Allowed,
        (_, CreatePrescription) => Forbidden,

        (Role::Patient, ReadPrescription | ListPrescriptions) => Scoped(Scope::OwnAsPatient),
        (Role::Physician, ReadPrescription | ListPrescriptions) => Scoped(Scope::Authored),
        (Role::Admin, ReadPrescription | ListPrescriptions) => Scoped(Scope::All),

        (Role::Patient, UpdatePrescriptionStatus) => Forbidden,
        (Role::Physician, UpdatePrescriptionStatus) => Scoped(Scope::Authored),
        (Role::Admin, UpdatePrescriptionStatus) => Scoped(Scope::All),

        (Role::Admin, ListUsers) => Allowed,
        (_, ListUsers) => Forbidden,

        (Role::Physician | Role::Admin, ListPatientHistory) => Allowed,
        (Role::Patient, ListPatientHistory) => Forbidden,

        (Role::Admin, ListPhysicianHistory) => Allowed,
        (_, ListPhysicianHistory) => Forbidden,
    }
}

/// A [`Scope`] bound to a concrete caller id, ready to filter a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    ForPatient(i64),
    ForPhysician(i64),
    Unrestricted,
}

impl Scope {
    pub fn bind(self, caller_id: i64) -> Visibility {
        match self {
            Scope::OwnAsPatient => Visibility::ForPatient(caller_id),
            Scope::Authored => Visibility::ForPhysician(caller_id),
            Scope::All => Visibility::Unrestricted,
        }
    }
}
