pub mod access;
pub mod domain;
pub mod ports;

pub use access::{decide, Action, Decision, Scope, Visibility};
pub use domain::{
    display_number, AdminStats, Medication, NewMedication, NewPharmacy, NewPrescription,
    NewPrescriptionLine, NewUser, PatientProfile, PatientStats, Pharmacy, PhysicianProfile,
    PhysicianStats, Prescription, PrescriptionDetail, PrescriptionLineDetail, PrescriptionReceipt,
    PrescriptionStatus, Profile, PushMessage, Role, RoleProfile, User, UserCredentials,
};
pub use ports::{DatabaseService, PortError, PortResult, PushGatewayService};
