//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: registration, login, and the caller's profile.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use receita_core::domain::{NewUser, Role, RoleProfile};
use receita_core::ports::PortError;

use crate::error::{ApiError, ErrorBody};
use crate::web::extract::Json;
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;
use crate::web::validate::required;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    /// One of "paciente", "medico" or "admin".
    pub tipo: Option<String>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub crm: Option<String>,
    pub especialidade: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub senha: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub tipo: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// The caller's user row merged with their role profile. Patient and
/// physician keys appear only when the matching profile row exists; a
/// present patient key may still hold null.
#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id_usuario: i64,
    pub nome: String,
    pub email: String,
    pub tipo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub especialidade: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /register - Create a new user account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Required fields, checked in the order the client shows them.
    let nome = required(&req.nome, "nome")?;
    let email = required(&req.email, "email")?;
    let senha = required(&req.senha, "senha")?;
    let tipo = required(&req.tipo, "tipo")?;

    let role = Role::from_wire(tipo)
        .ok_or_else(|| ApiError::Validation("Tipo de usuário inválido".to_string()))?;

    // 2. The duplicate-email check comes before any role-specific validation.
    if state.db.find_user_by_email(email).await?.is_some() {
        return Err(ApiError::Conflict("Email já cadastrado".to_string()));
    }

    // 3. Role-specific profile data. Patient fields are stored verbatim,
    //    empty strings included.
    let profile = match role {
        Role::Admin => RoleProfile::Admin,
        Role::Patient => RoleProfile::Patient {
            national_id: req.cpf.clone(),
            phone: req.telefone.clone(),
            address: req.endereco.clone(),
        },
        Role::Physician => {
            let (Some(crm), Some(especialidade)) = (
                req.crm.as_deref().filter(|v| !v.is_empty()),
                req.especialidade.as_deref().filter(|v| !v.is_empty()),
            ) else {
                return Err(ApiError::Validation(
                    "CRM e especialidade são obrigatórios para médicos".to_string(),
                ));
            };
            RoleProfile::Physician {
                license: crm.to_string(),
                specialty: especialidade.to_string(),
            }
        }
    };

    // 4. Hash the password.
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(senha.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?
        .to_string();

    // 5. Insert the user plus its profile row in one transaction. A
    //    concurrent registration can still slip past the check above, so a
    //    conflict from the insert maps to the same response.
    let new_user = NewUser {
        name: nome.to_string(),
        email: email.to_string(),
        hashed_password: password_hash,
        profile,
    };
    let user_id = match state.db.create_user(&new_user).await {
        Ok(id) => id,
        Err(PortError::Conflict(_)) => {
            return Err(ApiError::Conflict("Email já cadastrado".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Usuário cadastrado com sucesso".to_string(),
            user_id,
        }),
    ))
}

/// POST /login - Authenticate and receive a session token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Both fields share one error message.
    let (Some(email), Some(senha)) = (
        req.email.as_deref().filter(|v| !v.is_empty()),
        req.senha.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Email e senha são obrigatórios".to_string(),
        ));
    };

    // An unknown email and a wrong password are indistinguishable.
    let creds = state
        .db
        .find_user_by_email(email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&creds.hashed_password)
        .map_err(|e| ApiError::Internal(format!("Stored password hash is unreadable: {e}")))?;
    if Argon2::default()
        .verify_password(senha.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .tokens
        .issue(creds.id, &creds.email, creds.role)
        .map_err(|e| ApiError::Internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(LoginResponse {
        message: "Login realizado com sucesso".to_string(),
        token,
        user: UserSummary {
            id: creds.id,
            nome: creds.name,
            email: creds.email,
            tipo: creds.role.as_wire().to_string(),
        },
    }))
}

/// GET /profile - The authenticated caller's own profile
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .db
        .load_profile(caller.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuário não encontrado".to_string()))?;

    let mut response = ProfileResponse {
        id_usuario: profile.user.id,
        nome: profile.user.name,
        email: profile.user.email,
        tipo: profile.user.role.as_wire().to_string(),
        cpf: None,
        telefone: None,
        endereco: None,
        crm: None,
        especialidade: None,
    };
    if let Some(patient) = profile.patient {
        response.cpf = Some(patient.national_id);
        response.telefone = Some(patient.phone);
        response.endereco = Some(patient.address);
    }
    if let Some(physician) = profile.physician {
        response.crm = Some(physician.license);
        response.especialidade = Some(physician.specialty);
    }
    Ok(Json(response))
}
