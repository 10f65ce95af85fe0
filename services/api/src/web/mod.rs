pub mod auth;
pub mod catalog;
pub mod extract;
pub mod middleware;
pub mod notifications;
pub mod prescriptions;
pub mod rest;
pub mod state;
pub mod users;
pub mod validate;

// Re-export the pieces the binaries need to build the web server.
pub use middleware::require_auth;
pub use rest::ApiDoc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::web::state::AppState;

/// Builds the application router: public routes, protected routes behind
/// the auth middleware, and a permissive CORS layer for the mobile client.
///
/// `/receitas/stats` is registered alongside `/receitas/{id}`; the literal
/// segment wins, so "stats" is never parsed as an id.
pub fn router(app_state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/health", get(rest::health_handler))
        .route(
            "/notifications/send",
            post(notifications::send_notification_handler),
        )
        .route(
            "/notifications/register",
            post(notifications::register_token_handler),
        );

    let protected = Router::new()
        .route("/profile", get(auth::profile_handler))
        .route("/usuarios", get(users::list_users_handler))
        .route(
            "/medicamentos",
            get(catalog::list_medications_handler).post(catalog::create_medication_handler),
        )
        .route(
            "/farmacias",
            get(catalog::list_pharmacies_handler).post(catalog::create_pharmacy_handler),
        )
        .route(
            "/receitas",
            get(prescriptions::list_prescriptions_handler)
                .post(prescriptions::create_prescription_handler),
        )
        .route("/receitas/stats", get(prescriptions::stats_handler))
        .route("/receitas/{id}", get(prescriptions::get_prescription_handler))
        .route(
            "/receitas/{id}/status",
            put(prescriptions::update_status_handler),
        )
        .route(
            "/receitas/paciente/{id_paciente}",
            get(prescriptions::list_for_patient_handler),
        )
        .route(
            "/receitas/medico/{id_medico}",
            get(prescriptions::list_for_physician_handler),
        )
        .layer(from_fn_with_state(app_state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
