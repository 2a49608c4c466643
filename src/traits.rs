use crate::notifications::{Delivery, WebhookMessage};
use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Trait for sending notifications
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Post a message to the given webhook endpoint.
    ///
    /// Any status the endpoint answers with is returned as a [`Delivery`];
    /// only transport failures surface as errors.
    async fn send(&self, message: &WebhookMessage, endpoint: &str) -> Result<Delivery>;
}
