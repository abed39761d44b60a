use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::scheduling::Appointment;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Confirmation delivery collaborator. Booking success never depends on the
/// outcome of a send; callers dispatch fire-and-forget and log failures.
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_confirmation(&self, appointment: &Appointment) -> Result<(), NotificationError>;
}

/// POSTs the booked appointment to a configured webhook as JSON.
pub struct WebhookSender {
    client: Client,
    webhook_url: String,
}

impl WebhookSender {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl ConfirmationSender for WebhookSender {
    async fn send_confirmation(&self, appointment: &Appointment) -> Result<(), NotificationError> {
        debug!(
            "Sending booking confirmation {} to {}",
            appointment.codigo_confirmacao, self.webhook_url
        );

        let payload = json!({
            "event": "booking_confirmed",
            "appointment": appointment,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotificationError::Delivery(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Delivery(format!(
                "webhook answered {status}"
            )));
        }

        Ok(())
    }
}

/// Stand-in when no webhook is configured; confirmations are only logged.
pub struct DisabledSender;

#[async_trait]
impl ConfirmationSender for DisabledSender {
    async fn send_confirmation(&self, appointment: &Appointment) -> Result<(), NotificationError> {
        debug!(
            "Notification disabled, skipping confirmation {} for {}",
            appointment.codigo_confirmacao, appointment.email_cliente
        );
        Ok(())
    }
}

pub fn confirmation_sender(config: &AppConfig) -> Arc<dyn ConfirmationSender> {
    if config.notifications_configured() {
        Arc::new(WebhookSender::new(config.notification_webhook_url.clone()))
    } else {
        Arc::new(DisabledSender)
    }
}
