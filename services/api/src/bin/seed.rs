//! services/api/src/bin/seed.rs
//!
//! Resets the database and fills it with demo data: one admin, five
//! physicians, seven patients, a medication and pharmacy catalog, and 25
//! randomized prescriptions. Login credentials for the demo accounts are
//! written to `credenciais_teste.json`.

use api_lib::{adapters::db::DbAdapter, config::Config};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

use receita_core::domain::{
    NewMedication, NewPharmacy, NewPrescription, NewPrescriptionLine, NewUser, PrescriptionStatus,
    RoleProfile,
};
use receita_core::ports::DatabaseService;

// (name, email, license, specialty) - password is always "medico123"
const PHYSICIANS: [(&str, &str, &str, &str); 5] = [
    ("Dr. João Silva", "joao.silva@clinica.com", "CRM-SP 123456", "Cardiologia"),
    ("Dra. Maria Santos", "maria.santos@hospital.com", "CRM-RJ 789012", "Clínica Geral"),
    ("Dr. Carlos Oliveira", "carlos.oliveira@clinica.com", "CRM-MG 345678", "Endocrinologia"),
    ("Dra. Ana Costa", "ana.costa@hospital.com", "CRM-SP 901234", "Pediatria"),
    ("Dr. Ricardo Ferreira", "ricardo.ferreira@clinica.com", "CRM-RS 567890", "Neurologia"),
];

// (name, email, cpf, phone, address) - password is always "paciente123"
const PATIENTS: [(&str, &str, &str, &str, &str); 7] = [
    (
        "José da Silva",
        "jose.silva@email.com",
        "123.456.789-01",
        "(11) 98765-4321",
        "Rua das Flores, 123 - São Paulo/SP",
    ),
    (
        "Maria Oliveira",
        "maria.oliveira@email.com",
        "987.654.321-09",
        "(21) 91234-5678",
        "Av. Copacabana, 456 - Rio de Janeiro/RJ",
    ),
    (
        "Carlos Santos",
        "carlos.santos@email.com",
        "456.789.123-45",
        "(31) 99876-5432",
        "Rua Minas Gerais, 789 - Belo Horizonte/MG",
    ),
    (
        "Ana Paula Costa",
        "ana.costa@email.com",
        "321.654.987-12",
        "(85) 98765-1234",
        "Rua do Sol, 321 - Fortaleza/CE",
    ),
    (
        "Pedro Almeida",
        "pedro.almeida@email.com",
        "159.753.486-20",
        "(51) 97654-3210",
        "Av. Brasil, 654 - Porto Alegre/RS",
    ),
    (
        "Lucia Ferreira",
        "lucia.ferreira@email.com",
        "753.159.642-85",
        "(62) 96543-2109",
        "Rua Goiás, 987 - Goiânia/GO",
    ),
    (
        "Roberto Lima",
        "roberto.lima@email.com",
        "852.963.741-96",
        "(81) 95432-1098",
        "Av. Boa Viagem, 147 - Recife/PE",
    ),
];

// (name, active ingredient, manufacturer, barcode, prescription required)
const MEDICATIONS: [(&str, &str, &str, &str, bool); 10] = [
    ("Losartana 50mg", "Losartana Potássica", "EMS", "7891234567890", true),
    ("Paracetamol 500mg", "Paracetamol", "Medley", "7891234567891", false),
    ("Omeprazol 20mg", "Omeprazol", "Eurofarma", "7891234567892", true),
    ("Metformina 850mg", "Cloridrato de Metformina", "Sandoz", "7891234567893", true),
    ("Ibuprofeno 600mg", "Ibuprofeno", "Sanofi", "7891234567894", false),
    ("Atenolol 25mg", "Atenolol", "Germed", "7891234567895", true),
    ("Dipirona 500mg", "Dipirona Sódica", "Neo Química", "7891234567896", false),
    ("Sinvastatina 20mg", "Sinvastatina", "Ranbaxy", "7891234567897", true),
    ("Captopril 25mg", "Captopril", "Medquímica", "7891234567898", true),
    ("Amoxicilina 500mg", "Amoxicilina", "Novartis", "7891234567899", true),
];

// (cnpj, trade name, address, phone, technical responsible, lat, lon)
const PHARMACIES: [(&str, &str, &str, &str, &str, f64, f64); 5] = [
    (
        "12.345.678/0001-90",
        "Farmácia Central",
        "Av. Paulista, 1000 - São Paulo/SP",
        "(11) 3333-4444",
        "Farmacêutico João Pedro - CRF-SP 12345",
        -23.5613,
        -46.6560,
    ),
    (
        "98.765.432/0001-10",
        "Drogaria Popular",
        "Rua das Palmeiras, 250 - Rio de Janeiro/RJ",
        "(21) 2222-3333",
        "Farmacêutica Maria Clara - CRF-RJ 67890",
        -22.9068,
        -43.1729,
    ),
    (
        "11.222.333/0001-44",
        "Farmácia Saúde Total",
        "Av. Afonso Pena, 500 - Belo Horizonte/MG",
        "(31) 1111-2222",
        "Farmacêutico Carlos Eduardo - CRF-MG 11111",
        -19.9191,
        -43.9378,
    ),
    (
        "55.666.777/0001-88",
        "Drogaria Vida Nova",
        "Rua José de Alencar, 800 - Fortaleza/CE",
        "(85) 9999-8888",
        "Farmacêutica Ana Beatriz - CRF-CE 22222",
        -3.7319,
        -38.5267,
    ),
    (
        "33.444.555/0001-66",
        "Farmácia Bem Estar",
        "Av. Borges de Medeiros, 1200 - Porto Alegre/RS",
        "(51) 7777-6666",
        "Farmacêutico Ricardo Silva - CRF-RS 33333",
        -30.0346,
        -51.2177,
    ),
];

const DIAGNOSES: [&str; 10] = [
    "Hipertensão Arterial",
    "Diabetes Mellitus Tipo 2",
    "Infecção Respiratória",
    "Gastrite",
    "Cefaleia",
    "Artralgia",
    "Síndrome Gripal",
    "Dislipidemia",
    "Ansiedade",
    "Lombalgia",
];

const DOSAGES: [&str; 5] = [
    "1 comprimido",
    "2 comprimidos",
    "1/2 comprimido",
    "1 cápsula",
    "2 cápsulas",
];

const SCHEDULES: [&str; 10] = [
    "1 vez ao dia",
    "2 vezes ao dia",
    "3 vezes ao dia",
    "De 8 em 8 horas",
    "De 12 em 12 horas",
    "A cada 6 horas",
    "Antes das refeições",
    "Após as refeições",
    "Em jejum",
    "Ao deitar",
];

const GENERAL_NOTES: [&str; 5] = [
    "Paciente alérgico a dipirona",
    "Tomar com bastante água",
    "Evitar exposição ao sol",
    "Retornar em 15 dias",
    "Monitorar pressão arterial",
];

const LINE_NOTES: [&str; 5] = [
    "Tomar longe das refeições",
    "Não partir ou mastigar",
    "Pode causar sonolência",
    "Tomar com alimentos",
    "Interromper se houver efeitos colaterais",
];

const PRESCRIPTION_COUNT: usize = 25;

fn hash_password(password: &str) -> Result<String, Box<dyn std::error::Error>> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Empties every domain table. Children go first so the foreign keys
/// never trip even with enforcement left on.
async fn clear_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA foreign_keys = OFF").execute(pool).await?;
    for table in [
        "ReceitaMedicamento",
        "Receita",
        "Medicamento",
        "Farmacia",
        "Paciente",
        "Medico",
        "Usuario",
    ] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(pool).await?;
    }
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;
    Ok(())
}

fn write_credentials_file() -> Result<(), Box<dyn std::error::Error>> {
    let physicians: Vec<serde_json::Value> = PHYSICIANS
        .iter()
        .take(3)
        .map(|(name, email, license, specialty)| {
            serde_json::json!({
                "email": email,
                "senha": "medico123",
                "nome": name,
                "especialidade": specialty,
                "crm": license,
            })
        })
        .collect();
    let patients: Vec<serde_json::Value> = PATIENTS
        .iter()
        .take(3)
        .map(|(name, email, cpf, _, _)| {
            serde_json::json!({
                "email": email,
                "senha": "paciente123",
                "nome": name,
                "cpf": cpf,
            })
        })
        .collect();

    let credentials = serde_json::json!({
        "admin": {
            "email": "admin@sistema.com",
            "senha": "admin123",
            "tipo": "admin",
            "descricao": "Administrador do sistema - acesso total",
        },
        "medicos": physicians,
        "pacientes": patients,
    });
    std::fs::write(
        "credenciais_teste.json",
        serde_json::to_string_pretty(&credentials)?,
    )?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await?;
    let db = Arc::new(DbAdapter::new(pool.clone()));
    db.run_migrations().await?;

    println!("Clearing existing data...");
    clear_database(&pool).await?;

    println!("Seeding users...");
    let admin_id = db
        .create_user(&NewUser {
            name: "Administrador Sistema".to_string(),
            email: "admin@sistema.com".to_string(),
            hashed_password: hash_password("admin123")?,
            profile: RoleProfile::Admin,
        })
        .await?;

    let mut physician_ids = Vec::with_capacity(PHYSICIANS.len());
    for (name, email, license, specialty) in PHYSICIANS {
        let id = db
            .create_user(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                hashed_password: hash_password("medico123")?,
                profile: RoleProfile::Physician {
                    license: license.to_string(),
                    specialty: specialty.to_string(),
                },
            })
            .await?;
        physician_ids.push(id);
    }

    let mut patient_ids = Vec::with_capacity(PATIENTS.len());
    for (name, email, cpf, phone, address) in PATIENTS {
        let id = db
            .create_user(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                hashed_password: hash_password("paciente123")?,
                profile: RoleProfile::Patient {
                    national_id: Some(cpf.to_string()),
                    phone: Some(phone.to_string()),
                    address: Some(address.to_string()),
                },
            })
            .await?;
        patient_ids.push(id);
    }

    println!("Seeding medication catalog...");
    let mut medication_ids = Vec::with_capacity(MEDICATIONS.len());
    for (name, active_ingredient, manufacturer, barcode, prescription_required) in MEDICATIONS {
        let id = db
            .create_medication(&NewMedication {
                name: name.to_string(),
                active_ingredient: active_ingredient.to_string(),
                manufacturer: manufacturer.to_string(),
                barcode: Some(barcode.to_string()),
                prescription_required,
            })
            .await?;
        medication_ids.push(id);
    }

    println!("Seeding pharmacies...");
    for (tax_id, trade_name, address, phone, technical_responsible, latitude, longitude) in
        PHARMACIES
    {
        db.create_pharmacy(&NewPharmacy {
            tax_id: tax_id.to_string(),
            trade_name: trade_name.to_string(),
            address: address.to_string(),
            phone: Some(phone.to_string()),
            technical_responsible: Some(technical_responsible.to_string()),
            latitude: Some(latitude),
            longitude: Some(longitude),
        })
        .await?;
    }

    println!("Seeding prescriptions...");
    let mut rng = rand::thread_rng();
    let statuses = [
        PrescriptionStatus::Active,
        PrescriptionStatus::Used,
        PrescriptionStatus::Cancelled,
    ];
    for _ in 0..PRESCRIPTION_COUNT {
        let issued_at = Utc::now() - Duration::days(rng.gen_range(0..=60));
        let expires_at = (issued_at + Duration::days(rng.gen_range(15..=45))).date_naive();

        let line_count = rng.gen_range(1..=4);
        let lines: Vec<NewPrescriptionLine> = medication_ids
            .choose_multiple(&mut rng, line_count)
            .map(|&medication_id| NewPrescriptionLine {
                medication_id,
                dosage: DOSAGES.choose(&mut rng).unwrap().to_string(),
                quantity: rng.gen_range(1..=3),
                schedule: SCHEDULES.choose(&mut rng).unwrap().to_string(),
                notes: rng
                    .gen_bool(0.2)
                    .then(|| LINE_NOTES.choose(&mut rng).unwrap().to_string()),
            })
            .collect();

        let receipt = db
            .create_prescription(&NewPrescription {
                physician_id: *physician_ids.choose(&mut rng).unwrap(),
                patient_id: *patient_ids.choose(&mut rng).unwrap(),
                issued_at,
                expires_at,
                diagnosis: DIAGNOSES.choose(&mut rng).unwrap().to_string(),
                notes: rng
                    .gen_bool(0.3)
                    .then(|| GENERAL_NOTES.choose(&mut rng).unwrap().to_string()),
                lines,
            })
            .await?;

        // New prescriptions always start active; backdate some of them to
        // other statuses for a realistic mix.
        let status = *statuses.choose(&mut rng).unwrap();
        if status != PrescriptionStatus::Active {
            db.update_prescription_status(
                receipt.id,
                status,
                receita_core::access::Visibility::Unrestricted,
            )
            .await?;
        }
    }

    write_credentials_file()?;

    println!("Seed complete:");
    println!(
        "  users: {} (admin id {admin_id}, {} physicians, {} patients)",
        1 + physician_ids.len() + patient_ids.len(),
        physician_ids.len(),
        patient_ids.len()
    );
    println!("  medications: {}", medication_ids.len());
    println!("  pharmacies: {}", PHARMACIES.len());
    println!("  prescriptions: {PRESCRIPTION_COUNT}");
    println!("Demo credentials written to credenciais_teste.json");
    Ok(())
}
