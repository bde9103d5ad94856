use async_trait::async_trait;

use crate::domain::models::{Email, NotificationPayload};

/// Fire-and-forget delivery of user notifications.
///
/// Implementations swallow and log their own failures; a notification can
/// never fail the write that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, recipient: &Email, payload: NotificationPayload);
}
