pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::booking::BookingService;
pub use services::notification::{
    confirmation_sender, ConfirmationSender, DisabledSender, WebhookSender,
};
pub use services::stats::StatsService;
