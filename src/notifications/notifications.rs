use crate::traits::NotificationSender;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

pub const EMBED_TITLE: &str = "Nieuwe demo data ontvangen";
pub const EMBED_DESCRIPTION: &str = "Gegevens gedeeld via de consent-knop op de website.";

/// A single labeled value inside an embed
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: &str, value: String, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub timestamp: String,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Builds the visitor embed stamped with the current time.
    pub fn visitor(fields: Vec<EmbedField>) -> Self {
        Self {
            title: EMBED_TITLE.to_string(),
            description: EMBED_DESCRIPTION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            fields,
        }
    }
}

/// Body posted to a Discord webhook.
///
/// `content` is always serialized, as `null` when unset: Discord accepts either
/// plain text or embeds and this relay only ever sends embeds.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WebhookMessage {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    pub fn from_embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// Outcome of a webhook call that reached the remote service
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub status: StatusCode,
    pub body: String,
}

impl Delivery {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[tracing::instrument(name = "send", skip(message, endpoint), fields())]
pub async fn send(message: &WebhookMessage, endpoint: &str) -> Result<reqwest::Response> {
    let client = reqwest::Client::new();

    client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .json(message)
        .send()
        .await
        .context("Failed to reach the webhook endpoint")
}

/// Discord webhook implementation of NotificationSender
#[derive(Clone)]
pub struct DiscordWebhookSender;

impl DiscordWebhookSender {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiscordWebhookSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSender for DiscordWebhookSender {
    async fn send(&self, message: &WebhookMessage, endpoint: &str) -> Result<Delivery> {
        let response = send(message, endpoint).await?;
        let status = response.status();
        debug!("Webhook answered with status {}", status);

        // Discord usually answers 204 on success; the body only matters for diagnostics.
        let body = if status.is_success() {
            String::new()
        } else {
            response.text().await.unwrap_or_else(|e| {
                warn!("Failed to read webhook error body: {:?}", e);
                String::new()
            })
        };

        Ok(Delivery { status, body })
    }
}
