//! Outbound delivery of fired events.

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::errors::{DeskError, DeskResult};

/// Where fired events go. Every sink logs the event; the webhook
/// variant additionally POSTs it to the configured URL.
#[derive(Debug, Clone)]
pub enum EventSink {
    Log,
    Webhook(WebhookSink),
}

impl EventSink {
    /// Sink selected by the optional webhook URL.
    pub fn from_config(webhook_url: Option<&str>) -> DeskResult<Self> {
        match webhook_url {
            Some(url) => Ok(EventSink::Webhook(WebhookSink::new(url)?)),
            None => Ok(EventSink::Log),
        }
    }

    /// Emits one `{domain}.{event_type}` event. Delivery is best-effort;
    /// webhook failures are logged and swallowed.
    pub async fn fire(&self, domain: &str, event_type: &str, payload: &Value) {
        let event = format!("{domain}.{event_type}");
        info!(event = %event, "event fired");
        if let EventSink::Webhook(webhook) = self {
            webhook.post(&event, payload).await;
        }
    }
}

/// POSTs `{"event": ..., "data": ...}` bodies to one fixed URL.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    url: String,
    http: reqwest::Client,
}

impl WebhookSink {
    fn new(url: &str) -> DeskResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("trafik-bridge/0.1")
            .build()
            .map_err(|e| DeskError::Sink(e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, event: &str, payload: &Value) {
        let body = json!({ "event": event, "data": payload });
        match self.http.post(&self.url).json(&body).send().await {
            Ok(resp) => {
                if let Err(err) = resp.error_for_status_ref() {
                    warn!(?err, event = %event, "event webhook rejected the payload");
                }
                let _ = resp.bytes().await;
            }
            Err(err) => warn!(?err, event = %event, "event webhook unreachable"),
        }
    }
}
