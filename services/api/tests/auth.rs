//! Registration, login, profile, and token-handling behavior.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use common::{get, login, post, send, signup, test_app};

#[tokio::test]
async fn register_creates_account_and_login_issues_token() {
    let app = test_app().await;

    let payload = json!({
        "nome": "José da Silva",
        "email": "jose@email.com",
        "senha": "senha123",
        "tipo": "paciente",
        "cpf": "123.456.789-01",
        "telefone": "(11) 98765-4321",
        "endereco": "Rua das Flores, 123",
    });
    let (status, body) = post(&app, "/register", None, &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Usuário cadastrado com sucesso");
    assert!(body["user_id"].as_i64().unwrap() > 0);

    let (status, body) = login(&app, "jose@email.com", "senha123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login realizado com sucesso");
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["nome"], "José da Silva");
    assert_eq!(body["user"]["email"], "jose@email.com");
    assert_eq!(body["user"]["tipo"], "paciente");
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = test_app().await;
    signup(&app, "paciente", "Primeiro", "dup@email.com").await;

    let payload = json!({
        "nome": "Segundo",
        "email": "dup@email.com",
        "senha": "outra123",
        "tipo": "paciente",
    });
    let (status, body) = post(&app, "/register", None, &payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email já cadastrado");
}

#[tokio::test]
async fn register_reports_missing_fields_in_order() {
    let app = test_app().await;

    let cases = [
        (json!({}), "Campo nome é obrigatório"),
        (json!({ "nome": "A" }), "Campo email é obrigatório"),
        (json!({ "nome": "A", "email": "a@b.com" }), "Campo senha é obrigatório"),
        (
            json!({ "nome": "A", "email": "a@b.com", "senha": "x" }),
            "Campo tipo é obrigatório",
        ),
        // Empty strings count as missing, same as absent keys.
        (
            json!({ "nome": "", "email": "a@b.com", "senha": "x", "tipo": "paciente" }),
            "Campo nome é obrigatório",
        ),
    ];
    for (payload, message) in cases {
        let (status, body) = post(&app, "/register", None, &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn register_rejects_unknown_roles() {
    let app = test_app().await;
    let payload = json!({
        "nome": "A",
        "email": "a@b.com",
        "senha": "x",
        "tipo": "enfermeiro",
    });
    let (status, body) = post(&app, "/register", None, &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tipo de usuário inválido");
}

#[tokio::test]
async fn register_requires_license_and_specialty_for_physicians() {
    let app = test_app().await;

    let without_license = json!({
        "nome": "Dra. Maria",
        "email": "maria@clinica.com",
        "senha": "x",
        "tipo": "medico",
        "especialidade": "Pediatria",
    });
    let (status, body) = post(&app, "/register", None, &without_license).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "CRM e especialidade são obrigatórios para médicos");

    let empty_specialty = json!({
        "nome": "Dra. Maria",
        "email": "maria@clinica.com",
        "senha": "x",
        "tipo": "medico",
        "crm": "CRM-SP 12345",
        "especialidade": "",
    });
    let (status, body) = post(&app, "/register", None, &empty_specialty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "CRM e especialidade são obrigatórios para médicos");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = test_app().await;
    signup(&app, "paciente", "José", "jose@email.com").await;

    let (status, body) = login(&app, "jose@email.com", "errada").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas");

    // Unknown accounts answer exactly like wrong passwords.
    let (status, body) = login(&app, "ninguem@email.com", "senha123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = test_app().await;
    let (status, body) = post(&app, "/login", None, &json!({ "email": "a@b.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email e senha são obrigatórios");
}

#[tokio::test]
async fn profile_merges_patient_fields() {
    let app = test_app().await;

    let payload = json!({
        "nome": "José da Silva",
        "email": "jose@email.com",
        "senha": "senha123",
        "tipo": "paciente",
        "cpf": "123.456.789-01",
        "telefone": "(11) 98765-4321",
    });
    let (status, _) = post(&app, "/register", None, &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = login(&app, "jose@email.com", "senha123").await;
    let token = body["token"].as_str().unwrap();

    let (status, body) = get(&app, "/profile", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "José da Silva");
    assert_eq!(body["tipo"], "paciente");
    assert_eq!(body["cpf"], "123.456.789-01");
    assert_eq!(body["telefone"], "(11) 98765-4321");
    // The address was never supplied: the key is present but null.
    let fields = body.as_object().unwrap();
    assert!(fields.contains_key("endereco"));
    assert!(body["endereco"].is_null());
    // Physician keys are absent entirely for a patient.
    assert!(!fields.contains_key("crm"));
    assert!(!fields.contains_key("especialidade"));
}

#[tokio::test]
async fn profile_merges_physician_fields() {
    let app = test_app().await;
    let physician = signup(&app, "medico", "Dr. João", "joao@clinica.com").await;

    let (status, body) = get(&app, "/profile", Some(&physician.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo"], "medico");
    assert_eq!(body["crm"], "CRM-SP 11111");
    assert_eq!(body["especialidade"], "Clínica Geral");
    assert!(!body.as_object().unwrap().contains_key("cpf"));
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = test_app().await;
    let (status, body) = get(&app, "/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token é obrigatório");
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let app = test_app().await;
    let (status, body) = get(&app, "/profile", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token inválido");
}

#[tokio::test]
async fn expired_tokens_are_reported_as_expired() {
    let app = test_app().await;
    let patient = signup(&app, "paciente", "José", "jose@email.com").await;

    let claims = json!({
        "user_id": patient.id,
        "email": "jose@email.com",
        "tipo": "paciente",
        "iat": Utc::now().timestamp() - 90_000,
        "exp": Utc::now().timestamp() - 3_600,
    });
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    let (status, body) = get(&app, "/profile", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expirado");
}

#[tokio::test]
async fn tokens_for_unknown_users_are_rejected() {
    let app = test_app().await;
    let token = app
        .state
        .tokens
        .issue(9999, "fantasma@email.com", receita_core::domain::Role::Patient)
        .unwrap();

    let (status, body) = get(&app, "/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token inválido");
}

#[tokio::test]
async fn bare_tokens_without_bearer_prefix_are_accepted() {
    let app = test_app().await;
    let patient = signup(&app, "paciente", "José", "jose@email.com").await;

    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, patient.token.clone())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jose@email.com");
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let app = test_app().await;
    let patient = signup(&app, "paciente", "Carlos", "carlos@email.com").await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;
    signup(&app, "paciente", "Ana", "ana@email.com").await;

    let (status, body) = get(&app, "/usuarios", Some(&patient.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Acesso negado");

    let (status, body) = get(&app, "/usuarios", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    // Sorted by name.
    let names: Vec<&str> = rows.iter().map(|r| r["nome"].as_str().unwrap()).collect();
    assert_eq!(names, ["Administrador", "Ana", "Carlos"]);
    assert_eq!(rows[1]["tipo"], "paciente");
    assert!(rows[0]["id_usuario"].as_i64().unwrap() > 0);
}
