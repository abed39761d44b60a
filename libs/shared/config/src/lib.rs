use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub notification_webhook_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            notification_webhook_url: env::var("NOTIFICATION_WEBHOOK_URL").unwrap_or_else(|_| {
                warn!("NOTIFICATION_WEBHOOK_URL not set, confirmation notifications disabled");
                String::new()
            }),
        }
    }

    pub fn notifications_configured(&self) -> bool {
        !self.notification_webhook_url.is_empty()
    }
}
