//! Shared harness for the API integration tests.
//!
//! Each test gets its own application instance backed by an in-memory
//! SQLite database, and drives it through the router with `oneshot`
//! requests instead of binding a socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use api_lib::adapters::{DbAdapter, ExpoPushAdapter};
use api_lib::config::Config;
use api_lib::token::TokenService;
use api_lib::web::{self, state::AppState};

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

/// A registered account plus the token obtained by logging it in.
pub struct Account {
    pub id: i64,
    pub token: String,
}

pub async fn test_app() -> TestApp {
    let config = Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        log_level: tracing::Level::INFO,
        token_secret: "test-secret".to_string(),
        // Nothing listens on this port, so push delivery fails fast.
        expo_push_url: "http://127.0.0.1:9/push".to_string(),
    };

    // A single connection that never retires keeps the in-memory database
    // alive for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(&config.database_url)
        .await
        .expect("in-memory database should open");
    let db = DbAdapter::new(pool);
    db.run_migrations().await.expect("migrations should apply");

    let tokens = TokenService::new(&config.token_secret);
    let push = ExpoPushAdapter::new(config.expo_push_url.clone());
    let state = Arc::new(AppState {
        db: Arc::new(db),
        push: Arc::new(push),
        config: Arc::new(config),
        tokens,
    });

    TestApp {
        router: web::router(state.clone()),
        state,
    }
}

fn api_request(method: Method, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build")
}

pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router should answer");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

pub async fn get(app: &TestApp, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, api_request(Method::GET, uri, token, None)).await
}

pub async fn post(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    send(app, api_request(Method::POST, uri, token, Some(body))).await
}

pub async fn put(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    send(app, api_request(Method::PUT, uri, token, Some(body))).await
}

pub async fn login(app: &TestApp, email: &str, senha: &str) -> (StatusCode, Value) {
    post(app, "/login", None, &json!({ "email": email, "senha": senha })).await
}

/// Registers an account of the given role and logs it in.
///
/// Physician registrations get a fixed license and specialty; tests that
/// care about those fields register by hand.
pub async fn signup(app: &TestApp, tipo: &str, nome: &str, email: &str) -> Account {
    let mut payload = json!({
        "nome": nome,
        "email": email,
        "senha": "senha123",
        "tipo": tipo,
    });
    if tipo == "medico" {
        payload["crm"] = json!("CRM-SP 11111");
        payload["especialidade"] = json!("Clínica Geral");
    }
    let (status, body) = post(app, "/register", None, &payload).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

    let (status, body) = login(app, email, "senha123").await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    Account {
        id: body["user"]["id"].as_i64().expect("user id"),
        token: body["token"].as_str().expect("token").to_string(),
    }
}

pub async fn create_medication(app: &TestApp, token: &str, nome: &str) -> i64 {
    let payload = json!({
        "nome": nome,
        "principio_ativo": "Princípio Teste",
        "fabricante": "Laboratório Teste",
    });
    let (status, body) = post(app, "/medicamentos", Some(token), &payload).await;
    assert_eq!(status, StatusCode::CREATED, "medication failed: {body}");
    body["id"].as_i64().expect("medication id")
}

/// Issues a single-line prescription and returns the response body.
pub async fn create_prescription(
    app: &TestApp,
    physician_token: &str,
    patient_id: i64,
    medication_id: i64,
) -> Value {
    let payload = json!({
        "id_paciente": patient_id,
        "diagnostico": "Hipertensão Arterial",
        "medicamentos": [{
            "id_medicamento": medication_id,
            "dosagem": "1 comprimido",
            "quantidade": 1,
            "posologia": "2 vezes ao dia",
        }],
    });
    let (status, body) = post(app, "/receitas", Some(physician_token), &payload).await;
    assert_eq!(status, StatusCode::CREATED, "prescription failed: {body}");
    body
}
