//! services/api/src/adapters/push.rs
//!
//! This module contains the adapter for Expo's push notification service.
//! It implements the `PushGatewayService` port from the `core` crate.

use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;

use receita_core::domain::PushMessage;
use receita_core::ports::{PortError, PortResult, PushGatewayService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `PushGatewayService` port using the Expo push API.
#[derive(Clone)]
pub struct ExpoPushAdapter {
    client: reqwest::Client,
    push_url: String,
}

impl ExpoPushAdapter {
    /// Creates a new `ExpoPushAdapter` posting to the given endpoint.
    pub fn new(push_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            push_url,
        }
    }
}

/// The request body Expo expects. `sound` and `priority` are fixed so
/// notifications ring through on both platforms.
#[derive(Serialize)]
struct ExpoPushRequest<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    data: &'a serde_json::Value,
    sound: &'static str,
    priority: &'static str,
}

//=========================================================================================
// `PushGatewayService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PushGatewayService for ExpoPushAdapter {
    async fn send_push(&self, message: &PushMessage) -> PortResult<()> {
        let request = ExpoPushRequest {
            to: &message.to,
            title: &message.title,
            body: &message.body,
            data: &message.data,
            sound: "default",
            priority: "high",
        };

        let response = self
            .client
            .post(&self.push_url)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Gateway(format!(
                "Expo push service returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
