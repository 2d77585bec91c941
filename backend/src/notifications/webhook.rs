//! Single-attempt webhook delivery.
//!
//! [`WebhookDispatcher`] posts an event payload as JSON to every enabled
//! webhook registered for the event type. Each endpoint gets exactly one
//! attempt bounded by the configured timeout; failures are logged and
//! dropped so one bad endpoint never affects another or the caller.

use super::{NotificationEvent, WebhookRegistry};
use catalog_common::model::webhook::{TestDeliveryReport, Webhook};
use futures_util::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default bound on a single delivery attempt (`WEBHOOK_TIMEOUT_SECS`).
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Network, DNS, timeout and similar transport failures.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

pub struct WebhookDispatcher {
    client: reqwest::Client,
    registry: Arc<dyn WebhookRegistry>,
}

impl WebhookDispatcher {
    pub fn new(
        registry: Arc<dyn WebhookRegistry>,
        timeout: Duration,
    ) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, registry })
    }

    /// Delivers `event` to every matching webhook. Never fails.
    ///
    /// Returns the number of endpoints that accepted the payload with a 2xx
    /// status, which only matters to logs and tests.
    pub async fn dispatch(&self, event: &NotificationEvent) -> usize {
        let registry = self.registry.clone();
        let event_type = event.event_type.clone();
        let listed = tokio::task::spawn_blocking(move || registry.list_enabled(&event_type)).await;
        let webhooks = match listed {
            Ok(Ok(webhooks)) => webhooks,
            Ok(Err(e)) => {
                warn!("could not load webhooks for {}: {}", event.event_type, e);
                return 0;
            }
            Err(e) => {
                warn!("webhook lookup for {} aborted: {}", event.event_type, e);
                return 0;
            }
        };

        let attempts = webhooks.iter().map(|webhook| async move {
            match self.send(&webhook.url, &event.payload).await {
                Ok(()) => {
                    debug!("delivered {} to {}", event.event_type, webhook.url);
                    true
                }
                Err(e) => {
                    warn!("delivery of {} to {} failed: {}", event.event_type, webhook.url, e);
                    false
                }
            }
        });

        join_all(attempts).await.into_iter().filter(|ok| *ok).count()
    }

    /// Sends `{"test": true}` once and reports what happened.
    ///
    /// Any HTTP response counts as success; its status code is reported so
    /// the caller can judge it.
    pub async fn test_delivery(&self, webhook: &Webhook) -> TestDeliveryReport {
        let started = Instant::now();
        match self
            .client
            .post(&webhook.url)
            .json(&serde_json::json!({ "test": true }))
            .send()
            .await
        {
            Ok(response) => TestDeliveryReport::delivered(
                response.status().as_u16(),
                started.elapsed().as_secs_f64(),
            ),
            Err(e) => TestDeliveryReport::failed(e.to_string()),
        }
    }

    async fn send(&self, url: &str, payload: &serde_json::Value) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
