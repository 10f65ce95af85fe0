//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sqlx::{FromRow, SqlitePool};

use receita_core::access::Visibility;
use receita_core::domain::{
    AdminStats, Medication, NewMedication, NewPharmacy, NewPrescription, NewUser, PatientProfile,
    PatientStats, Pharmacy, PhysicianProfile, PhysicianStats, Prescription, PrescriptionDetail,
    PrescriptionLineDetail, PrescriptionReceipt, PrescriptionStatus, Profile, Role, RoleProfile,
    User, UserCredentials,
};
use receita_core::ports::{DatabaseService, PortError, PortResult};

/// Timestamps are stored as TEXT in this exact shape. The mobile client
/// parses the same strings, so the format is part of the wire contract.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Validity dates are stored as TEXT, date only.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Lines for one prescription, joined with the medication catalog.
    /// Rows come back in insertion order.
    async fn load_lines(&self, prescription_id: i64) -> PortResult<Vec<PrescriptionLineDetail>> {
        let records = sqlx::query_as::<_, LineRecord>(
            "SELECT rm.id_medicamento, rm.dosagem, rm.quantidade, rm.posologia, rm.observacoes, \
             md.nome, md.principio_ativo, md.fabricante \
             FROM ReceitaMedicamento rm \
             JOIN Medicamento md ON md.id_medicamento = rm.id_medicamento \
             WHERE rm.id_receita = ?",
        )
        .bind(prescription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(LineRecord::to_domain).collect())
    }
}

//=========================================================================================
// Parsing Helpers
//=========================================================================================

fn parse_datetime(raw: &str) -> PortResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .map_err(|e| PortError::Unexpected(format!("Malformed timestamp '{raw}': {e}")))?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn parse_date(raw: &str) -> PortResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| PortError::Unexpected(format!("Malformed date '{raw}': {e}")))
}

fn parse_role(raw: &str) -> PortResult<Role> {
    Role::from_wire(raw).ok_or_else(|| PortError::Unexpected(format!("Unknown user type '{raw}'")))
}

fn parse_status(raw: &str) -> PortResult<PrescriptionStatus> {
    PrescriptionStatus::from_wire(raw)
        .ok_or_else(|| PortError::Unexpected(format!("Unknown prescription status '{raw}'")))
}

/// The `WHERE` fragment and bind value that narrow a query to a caller's
/// visibility. `prefix` qualifies the column when the query aliases tables.
fn visibility_filter(visibility: Visibility, prefix: &str) -> (String, Option<i64>) {
    match visibility {
        Visibility::ForPatient(id) => (format!(" AND {prefix}id_paciente = ?"), Some(id)),
        Visibility::ForPhysician(id) => (format!(" AND {prefix}id_medico = ?"), Some(id)),
        Visibility::Unrestricted => (String::new(), None),
    }
}

/// Prescription rows joined with both parties' names and the physician's
/// registry data. Shared by the single-row and list queries.
const PRESCRIPTION_SELECT: &str =
    "SELECT r.id_receita, r.id_medico, r.id_paciente, r.data_emissao, r.data_validade, \
     r.diagnostico, r.observacoes, r.status, \
     mu.nome AS nome_medico, m.especialidade, m.crm, pu.nome AS nome_paciente \
     FROM Receita r \
     JOIN Medico m ON m.id_medico = r.id_medico \
     JOIN Usuario mu ON mu.id_usuario = r.id_medico \
     JOIN Usuario pu ON pu.id_usuario = r.id_paciente";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id_usuario: i64,
    nome: String,
    email: String,
    tipo: String,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: self.id_usuario,
            name: self.nome,
            email: self.email,
            role: parse_role(&self.tipo)?,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id_usuario: i64,
    nome: String,
    email: String,
    senha: String,
    tipo: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> PortResult<UserCredentials> {
        Ok(UserCredentials {
            id: self.id_usuario,
            name: self.nome,
            email: self.email,
            hashed_password: self.senha,
            role: parse_role(&self.tipo)?,
        })
    }
}

#[derive(FromRow)]
struct PatientProfileRecord {
    id_paciente: i64,
    cpf: Option<String>,
    telefone: Option<String>,
    endereco: Option<String>,
}
impl PatientProfileRecord {
    fn to_domain(self) -> PatientProfile {
        PatientProfile {
            user_id: self.id_paciente,
            national_id: self.cpf,
            phone: self.telefone,
            address: self.endereco,
        }
    }
}

#[derive(FromRow)]
struct PhysicianProfileRecord {
    id_medico: i64,
    crm: String,
    especialidade: String,
}
impl PhysicianProfileRecord {
    fn to_domain(self) -> PhysicianProfile {
        PhysicianProfile {
            user_id: self.id_medico,
            license: self.crm,
            specialty: self.especialidade,
        }
    }
}

#[derive(FromRow)]
struct MedicationRecord {
    id_medicamento: i64,
    nome: String,
    principio_ativo: String,
    fabricante: String,
    codigo_barras: Option<String>,
    prescricao_obrigatoria: i64,
}
impl MedicationRecord {
    fn to_domain(self) -> Medication {
        Medication {
            id: self.id_medicamento,
            name: self.nome,
            active_ingredient: self.principio_ativo,
            manufacturer: self.fabricante,
            barcode: self.codigo_barras,
            prescription_required: self.prescricao_obrigatoria != 0,
        }
    }
}

#[derive(FromRow)]
struct PharmacyRecord {
    id_farmacia: i64,
    cnpj: String,
    nome_fantasia: String,
    endereco: String,
    telefone: Option<String>,
    responsavel_tecnico: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}
impl PharmacyRecord {
    fn to_domain(self) -> Pharmacy {
        Pharmacy {
            id: self.id_farmacia,
            tax_id: self.cnpj,
            trade_name: self.nome_fantasia,
            address: self.endereco,
            phone: self.telefone,
            technical_responsible: self.responsavel_tecnico,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(FromRow)]
struct PrescriptionRecord {
    id_receita: i64,
    id_medico: i64,
    id_paciente: i64,
    data_emissao: String,
    data_validade: String,
    diagnostico: String,
    observacoes: Option<String>,
    status: String,
}
impl PrescriptionRecord {
    fn to_domain(self) -> PortResult<Prescription> {
        Ok(Prescription {
            id: self.id_receita,
            physician_id: self.id_medico,
            patient_id: self.id_paciente,
            issued_at: parse_datetime(&self.data_emissao)?,
            expires_at: parse_date(&self.data_validade)?,
            diagnosis: self.diagnostico,
            notes: self.observacoes,
            status: parse_status(&self.status)?,
        })
    }
}

#[derive(FromRow)]
struct PrescriptionRowRecord {
    id_receita: i64,
    id_medico: i64,
    id_paciente: i64,
    data_emissao: String,
    data_validade: String,
    diagnostico: String,
    observacoes: Option<String>,
    status: String,
    nome_medico: String,
    especialidade: String,
    crm: String,
    nome_paciente: String,
}
impl PrescriptionRowRecord {
    fn to_domain(self, lines: Vec<PrescriptionLineDetail>) -> PortResult<PrescriptionDetail> {
        Ok(PrescriptionDetail {
            prescription: Prescription {
                id: self.id_receita,
                physician_id: self.id_medico,
                patient_id: self.id_paciente,
                issued_at: parse_datetime(&self.data_emissao)?,
                expires_at: parse_date(&self.data_validade)?,
                diagnosis: self.diagnostico,
                notes: self.observacoes,
                status: parse_status(&self.status)?,
            },
            physician_name: self.nome_medico,
            physician_specialty: self.especialidade,
            physician_license: self.crm,
            patient_name: self.nome_paciente,
            lines,
        })
    }
}

#[derive(FromRow)]
struct LineRecord {
    id_medicamento: i64,
    dosagem: String,
    quantidade: i64,
    posologia: String,
    observacoes: Option<String>,
    nome: String,
    principio_ativo: String,
    fabricante: String,
}
impl LineRecord {
    fn to_domain(self) -> PrescriptionLineDetail {
        PrescriptionLineDetail {
            medication_id: self.id_medicamento,
            dosage: self.dosagem,
            quantity: self.quantidade,
            schedule: self.posologia,
            notes: self.observacoes,
            medication_name: self.nome,
            active_ingredient: self.principio_ativo,
            manufacturer: self.fabricante,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, new_user: &NewUser) -> PortResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query("INSERT INTO Usuario (nome, email, senha, tipo) VALUES (?, ?, ?, ?)")
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.hashed_password)
            .bind(new_user.profile.role().as_wire())
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    PortError::Conflict(format!("Email {} is already registered", new_user.email))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        let user_id = result.last_insert_rowid();

        match &new_user.profile {
            RoleProfile::Admin => {}
            RoleProfile::Patient {
                national_id,
                phone,
                address,
            } => {
                sqlx::query(
                    "INSERT INTO Paciente (id_paciente, cpf, telefone, endereco) VALUES (?, ?, ?, ?)",
                )
                .bind(user_id)
                .bind(national_id)
                .bind(phone)
                .bind(address)
                .execute(&mut *tx)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
            }
            RoleProfile::Physician { license, specialty } => {
                sqlx::query("INSERT INTO Medico (id_medico, crm, especialidade) VALUES (?, ?, ?)")
                    .bind(user_id)
                    .bind(license)
                    .bind(specialty)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(user_id)
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id_usuario, nome, email, senha, tipo FROM Usuario WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        record.map(CredentialsRecord::to_domain).transpose()
    }

    async fn find_user_by_id(&self, user_id: i64) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id_usuario, nome, email, tipo FROM Usuario WHERE id_usuario = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        record.map(UserRecord::to_domain).transpose()
    }

    async fn load_profile(&self, user_id: i64) -> PortResult<Option<Profile>> {
        let Some(user) = self.find_user_by_id(user_id).await? else {
            return Ok(None);
        };

        let patient = sqlx::query_as::<_, PatientProfileRecord>(
            "SELECT id_paciente, cpf, telefone, endereco FROM Paciente WHERE id_paciente = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let physician = sqlx::query_as::<_, PhysicianProfileRecord>(
            "SELECT id_medico, crm, especialidade FROM Medico WHERE id_medico = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(Some(Profile {
            user,
            patient: patient.map(PatientProfileRecord::to_domain),
            physician: physician.map(PhysicianProfileRecord::to_domain),
        }))
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT id_usuario, nome, email, tipo FROM Usuario ORDER BY nome",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        records.into_iter().map(UserRecord::to_domain).collect()
    }

    async fn patient_exists(&self, user_id: i64) -> PortResult<bool> {
        let row = sqlx::query_scalar::<_, i64>("SELECT id_paciente FROM Paciente WHERE id_paciente = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(row.is_some())
    }

    async fn create_medication(&self, new_medication: &NewMedication) -> PortResult<i64> {
        let result = sqlx::query(
            "INSERT INTO Medicamento (nome, principio_ativo, fabricante, codigo_barras, prescricao_obrigatoria) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_medication.name)
        .bind(&new_medication.active_ingredient)
        .bind(&new_medication.manufacturer)
        .bind(&new_medication.barcode)
        .bind(new_medication.prescription_required)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.last_insert_rowid())
    }

    async fn list_medications(&self) -> PortResult<Vec<Medication>> {
        let records = sqlx::query_as::<_, MedicationRecord>(
            "SELECT id_medicamento, nome, principio_ativo, fabricante, codigo_barras, prescricao_obrigatoria \
             FROM Medicamento ORDER BY nome",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(MedicationRecord::to_domain).collect())
    }

    async fn medication_exists(&self, medication_id: i64) -> PortResult<bool> {
        let row = sqlx::query_scalar::<_, i64>(
            "SELECT id_medicamento FROM Medicamento WHERE id_medicamento = ?",
        )
        .bind(medication_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(row.is_some())
    }

    async fn create_pharmacy(&self, new_pharmacy: &NewPharmacy) -> PortResult<i64> {
        let result = sqlx::query(
            "INSERT INTO Farmacia (cnpj, nome_fantasia, endereco, telefone, responsavel_tecnico, latitude, longitude) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_pharmacy.tax_id)
        .bind(&new_pharmacy.trade_name)
        .bind(&new_pharmacy.address)
        .bind(&new_pharmacy.phone)
        .bind(&new_pharmacy.technical_responsible)
        .bind(new_pharmacy.latitude)
        .bind(new_pharmacy.longitude)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.last_insert_rowid())
    }

    async fn list_pharmacies(&self) -> PortResult<Vec<Pharmacy>> {
        let records = sqlx::query_as::<_, PharmacyRecord>(
            "SELECT id_farmacia, cnpj, nome_fantasia, endereco, telefone, responsavel_tecnico, latitude, longitude \
             FROM Farmacia ORDER BY nome_fantasia",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(PharmacyRecord::to_domain).collect())
    }

    async fn create_prescription(
        &self,
        new_prescription: &NewPrescription,
    ) -> PortResult<PrescriptionReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO Receita (id_medico, id_paciente, data_emissao, data_validade, diagnostico, observacoes, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new_prescription.physician_id)
        .bind(new_prescription.patient_id)
        .bind(new_prescription.issued_at.format(DATETIME_FORMAT).to_string())
        .bind(new_prescription.expires_at.format(DATE_FORMAT).to_string())
        .bind(&new_prescription.diagnosis)
        .bind(&new_prescription.notes)
        .bind(PrescriptionStatus::Active.as_wire())
        .execute(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let prescription_id = result.last_insert_rowid();

        for line in &new_prescription.lines {
            sqlx::query(
                "INSERT INTO ReceitaMedicamento (id_receita, id_medicamento, dosagem, quantidade, posologia, observacoes) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(prescription_id)
            .bind(line.medication_id)
            .bind(&line.dosage)
            .bind(line.quantity)
            .bind(&line.schedule)
            .bind(&line.notes)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(PrescriptionReceipt {
            id: prescription_id,
            issued_at: new_prescription.issued_at,
            expires_at: new_prescription.expires_at,
            line_count: new_prescription.lines.len(),
        })
    }

    async fn load_prescription(
        &self,
        prescription_id: i64,
        visibility: Visibility,
    ) -> PortResult<Option<PrescriptionDetail>> {
        let (filter, scope_id) = visibility_filter(visibility, "r.");
        let sql = format!("{PRESCRIPTION_SELECT} WHERE r.id_receita = ?{filter}");

        let mut query = sqlx::query_as::<_, PrescriptionRowRecord>(&sql).bind(prescription_id);
        if let Some(id) = scope_id {
            query = query.bind(id);
        }
        let Some(record) = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
        else {
            return Ok(None);
        };

        let lines = self.load_lines(record.id_receita).await?;
        Ok(Some(record.to_domain(lines)?))
    }

    async fn list_prescriptions(
        &self,
        visibility: Visibility,
    ) -> PortResult<Vec<PrescriptionDetail>> {
        let (filter, scope_id) = visibility_filter(visibility, "r.");
        let sql = format!("{PRESCRIPTION_SELECT} WHERE 1=1{filter} ORDER BY r.data_emissao DESC");

        let mut query = sqlx::query_as::<_, PrescriptionRowRecord>(&sql);
        if let Some(id) = scope_id {
            query = query.bind(id);
        }
        let records = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let mut details = Vec::with_capacity(records.len());
        for record in records {
            let lines = self.load_lines(record.id_receita).await?;
            details.push(record.to_domain(lines)?);
        }
        Ok(details)
    }

    async fn update_prescription_status(
        &self,
        prescription_id: i64,
        status: PrescriptionStatus,
        visibility: Visibility,
    ) -> PortResult<Option<Prescription>> {
        let (filter, scope_id) = visibility_filter(visibility, "");
        let sql = format!("UPDATE Receita SET status = ? WHERE id_receita = ?{filter}");

        let mut query = sqlx::query(&sql).bind(status.as_wire()).bind(prescription_id);
        if let Some(id) = scope_id {
            query = query.bind(id);
        }
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let record = sqlx::query_as::<_, PrescriptionRecord>(
            "SELECT id_receita, id_medico, id_paciente, data_emissao, data_validade, diagnostico, observacoes, status \
             FROM Receita WHERE id_receita = ?",
        )
        .bind(prescription_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Some(record.to_domain()?))
    }

    async fn patient_stats(&self, patient_id: i64) -> PortResult<PatientStats> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Receita WHERE id_paciente = ?")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM Receita WHERE id_paciente = ? AND status = ?",
        )
        .bind(patient_id)
        .bind(PrescriptionStatus::Active.as_wire())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let used = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM Receita WHERE id_paciente = ? AND status = ?",
        )
        .bind(patient_id)
        .bind(PrescriptionStatus::Used.as_wire())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(PatientStats {
            total,
            active,
            used,
        })
    }

    async fn physician_stats(&self, physician_id: i64) -> PortResult<PhysicianStats> {
        let total_prescribed =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Receita WHERE id_medico = ?")
                .bind(physician_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM Receita WHERE id_medico = ? AND status = ?",
        )
        .bind(physician_id)
        .bind(PrescriptionStatus::Active.as_wire())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let patients_treated = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT id_paciente) FROM Receita WHERE id_medico = ?",
        )
        .bind(physician_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(PhysicianStats {
            total_prescribed,
            active,
            patients_treated,
        })
    }

    async fn admin_stats(&self) -> PortResult<AdminStats> {
        let total_prescriptions = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Receita")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Usuario")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let total_medications = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Medicamento")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let total_pharmacies = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM Farmacia")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(AdminStats {
            total_prescriptions,
            total_users,
            total_medications,
            total_pharmacies,
        })
    }
}
