use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::domain::{
    models::{Email, NotificationPayload},
    ports::outbound::Notifier,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookMessage<'a> {
    to: &'a str,
    subject: String,
    #[serde(flatten)]
    payload: &'a NotificationPayload,
}

/// Posts each notification as JSON to a mail relay or similar webhook.
///
/// Delivery runs on a spawned task so the request that triggered it never
/// waits on, or fails because of, the relay.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Url,
}

impl WebhookNotifier {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, recipient: &Email, payload: NotificationPayload) {
        let client = self.client.clone();
        let url = self.url.clone();
        let recipient = recipient.clone();

        tokio::spawn(async move {
            let message = WebhookMessage {
                to: &recipient,
                subject: payload.subject(),
                payload: &payload,
            };
            let result = client
                .post(url)
                .json(&message)
                .send()
                .await
                .and_then(|resp| resp.error_for_status());
            match result {
                Ok(_) => tracing::debug!(%recipient, "delivered notification"),
                Err(e) => tracing::error!("failed to deliver notification to {recipient}: {e}"),
            }
        });
    }
}
