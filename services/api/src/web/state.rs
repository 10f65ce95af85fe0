//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use receita_core::ports::{DatabaseService, PushGatewayService};

use crate::config::Config;
use crate::token::TokenService;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub push: Arc<dyn PushGatewayService>,
    pub config: Arc<Config>,
    pub tokens: TokenService,
}
