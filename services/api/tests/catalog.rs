//! Medication and pharmacy catalog endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{get, post, signup, test_app};

#[tokio::test]
async fn medications_can_be_created_and_listed() {
    let app = test_app().await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;

    let payload = json!({
        "nome": "Losartana 50mg",
        "principio_ativo": "Losartana Potássica",
        "fabricante": "EMS",
        "codigo_barras": "7891234567890",
        "prescricao_obrigatoria": true,
    });
    let (status, body) = post(&app, "/medicamentos", Some(&admin.token), &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Medicamento criado com sucesso");
    assert!(body["id"].as_i64().unwrap() > 0);

    // Minimal payload: no barcode, prescription flag defaults to false.
    let minimal = json!({
        "nome": "Dipirona 500mg",
        "principio_ativo": "Dipirona Sódica",
        "fabricante": "Neo Química",
    });
    let (status, _) = post(&app, "/medicamentos", Some(&admin.token), &minimal).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&app, "/medicamentos", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Sorted by name: Dipirona before Losartana.
    assert_eq!(rows[0]["nome"], "Dipirona 500mg");
    assert_eq!(rows[0]["prescricao_obrigatoria"], false);
    assert!(rows[0]["codigo_barras"].is_null());
    assert_eq!(rows[1]["nome"], "Losartana 50mg");
    assert_eq!(rows[1]["prescricao_obrigatoria"], true);
    assert_eq!(rows[1]["codigo_barras"], "7891234567890");
}

#[tokio::test]
async fn medication_fields_are_validated_in_order() {
    let app = test_app().await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;

    let (status, body) = post(&app, "/medicamentos", Some(&admin.token), &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Campo nome é obrigatório");

    let partial = json!({ "nome": "Losartana 50mg", "fabricante": "EMS" });
    let (status, body) = post(&app, "/medicamentos", Some(&admin.token), &partial).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Campo principio_ativo é obrigatório");
}

#[tokio::test]
async fn pharmacy_requires_core_fields() {
    let app = test_app().await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;

    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Campo cnpj é obrigatório");

    let partial = json!({ "cnpj": "12.345.678/0001-90", "nome_fantasia": "Farmácia Central" });
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &partial).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Campo endereco é obrigatório");
}

#[tokio::test]
async fn pharmacy_coordinates_must_be_numeric_and_in_range() {
    let app = test_app().await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;
    let base = json!({
        "cnpj": "12.345.678/0001-90",
        "nome_fantasia": "Farmácia Central",
        "endereco": "Av. Paulista, 1000",
    });

    let mut bad_lat = base.clone();
    bad_lat["latitude"] = json!("abc");
    bad_lat["longitude"] = json!(-46.6560);
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &bad_lat).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Latitude deve ser um número válido");

    let mut out_of_range = base.clone();
    out_of_range["latitude"] = json!(100);
    out_of_range["longitude"] = json!(-46.6560);
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &out_of_range).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Latitude deve estar entre -90 e 90");

    let mut bad_lon = base.clone();
    bad_lon["latitude"] = json!(-23.5613);
    bad_lon["longitude"] = json!(-200);
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &bad_lon).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Longitude deve estar entre -180 e 180");
}

#[tokio::test]
async fn pharmacy_coordinates_come_in_pairs() {
    let app = test_app().await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;

    let lat_only = json!({
        "cnpj": "12.345.678/0001-90",
        "nome_fantasia": "Farmácia Central",
        "endereco": "Av. Paulista, 1000",
        "latitude": -23.5613,
    });
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &lat_only).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Latitude e longitude devem ser fornecidas juntas");
}

#[tokio::test]
async fn pharmacy_create_echoes_parsed_coordinates() {
    let app = test_app().await;
    let admin = signup(&app, "admin", "Administrador", "admin@sistema.com").await;

    // Numeric strings are accepted and parsed.
    let payload = json!({
        "cnpj": "12.345.678/0001-90",
        "nome_fantasia": "Farmácia Central",
        "endereco": "Av. Paulista, 1000",
        "telefone": "(11) 3333-4444",
        "latitude": "-23.5613",
        "longitude": -46.6560,
    });
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Farmácia criada com sucesso");
    assert_eq!(body["coordenadas"]["latitude"], -23.5613);
    assert_eq!(body["coordenadas"]["longitude"], -46.6560);

    // Without coordinates the key is omitted entirely.
    let plain = json!({
        "cnpj": "98.765.432/0001-10",
        "nome_fantasia": "Drogaria Popular",
        "endereco": "Rua das Palmeiras, 250",
    });
    let (status, body) = post(&app, "/farmacias", Some(&admin.token), &plain).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!body.as_object().unwrap().contains_key("coordenadas"));

    let (status, body) = get(&app, "/farmacias", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Sorted by trade name: Drogaria before Farmácia.
    assert_eq!(rows[0]["nome_fantasia"], "Drogaria Popular");
    assert!(rows[0]["latitude"].is_null());
    assert_eq!(rows[1]["nome_fantasia"], "Farmácia Central");
    assert_eq!(rows[1]["latitude"], -23.5613);
}

#[tokio::test]
async fn catalog_requires_authentication() {
    let app = test_app().await;
    let (status, body) = get(&app, "/medicamentos", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token é obrigatório");
}
