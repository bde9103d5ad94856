//! Outbound notification delivery.

mod webhook;

use async_trait::async_trait;

use crate::domain::{
    models::{Email, NotificationPayload},
    ports::outbound::Notifier,
};

pub use webhook::WebhookNotifier;

/// Writes notifications to the log. Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, recipient: &Email, payload: NotificationPayload) {
        tracing::info!(
            %recipient,
            subject = %payload.subject(),
            "notification (no transport configured)"
        );
    }
}
