//! Push notification relay, token registration, and the health probe.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use common::{get, post, send, test_app};

#[tokio::test]
async fn send_requires_token_title_and_body() {
    let app = test_app().await;

    let cases = [
        json!({}),
        json!({ "token": "ExponentPushToken[abc]" }),
        json!({ "token": "ExponentPushToken[abc]", "title": "Receita" }),
        json!({ "token": "", "title": "Receita", "body": "Nova receita disponível" }),
    ];
    for payload in cases {
        let (status, body) = post(&app, "/notifications/send", None, &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["message"], "Dados incompletos");
    }
}

#[tokio::test]
async fn unreachable_push_gateway_maps_to_bad_gateway() {
    // The test config points the Expo URL at a closed local port.
    let app = test_app().await;
    let payload = json!({
        "token": "ExponentPushToken[abc]",
        "title": "Receita Digital",
        "body": "Nova receita disponível",
        "data": { "id_receita": 1 },
    });
    let (status, body) = post(&app, "/notifications/send", None, &payload).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Falha ao enviar notificação");
}

#[tokio::test]
async fn token_registration_acknowledges_the_token() {
    let app = test_app().await;

    let (status, body) = post(&app, "/notifications/register", None, &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Token não fornecido");

    let payload = json!({ "token": "ExponentPushToken[abc]", "platform": "android" });
    let (status, body) = post(&app, "/notifications/register", None, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token registrado com sucesso");
}

#[tokio::test]
async fn health_answers_without_authentication() {
    let app = test_app().await;
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "API funcionando!");
    assert!(!body["timestamp"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_bodies_are_rejected_uniformly() {
    let app = test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/notifications/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "JSON inválido");
}
