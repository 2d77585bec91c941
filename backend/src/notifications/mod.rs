//! Best-effort change notifications.
//!
//! The ingestion worker only sees the [`Notifier`] capability: hand an event
//! over and move on. Nothing comes back, so a slow or broken endpoint can
//! neither fail nor retry an ingestion job.
//!
//! In the server, [`ChannelNotifier`] queues events on an unbounded channel
//! and [`start_notification_dispatcher`] drains it on a single task, so
//! events reach the [`WebhookDispatcher`] in the order they were emitted.

mod registry;
mod webhook;

pub use registry::{SqliteWebhookRegistry, WebhookPatch, WebhookRegistry};
pub use webhook::{WebhookDispatcher, WebhookError, DELIVERY_TIMEOUT};

use catalog_common::model::webhook::PRODUCT_IMPORTED;
use log::warn;
use std::sync::Arc;
use tokio::sync::mpsc;

/// An in-flight notification. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl NotificationEvent {
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// Emitted after batch `batch` (zero-based) of an upload has committed.
    pub fn product_imported(batch: usize) -> Self {
        Self::new(PRODUCT_IMPORTED, serde_json::json!({ "batch": batch }))
    }
}

/// Fire-and-forget notification capability.
///
/// Implementations must not block on delivery, must not retry and must not
/// report failures: there is no guaranteed delivery.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: NotificationEvent);
}

#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<NotificationEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: NotificationEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("notification dropped, dispatcher is gone: {:?}", e.0.event_type);
        }
    }
}

/// Delivers queued events one after another until every sender is dropped.
pub async fn start_notification_dispatcher(
    dispatcher: Arc<WebhookDispatcher>,
    mut rx: mpsc::UnboundedReceiver<NotificationEvent>,
) {
    while let Some(event) = rx.recv().await {
        dispatcher.dispatch(&event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_imported_carries_batch_index() {
        let event = NotificationEvent::product_imported(2);
        assert_eq!(event.event_type, "product.imported");
        assert_eq!(event.payload, serde_json::json!({ "batch": 2 }));
    }

    #[test]
    fn channel_notifier_preserves_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = ChannelNotifier::new(tx);
        for batch in 0..3 {
            notifier.notify(NotificationEvent::product_imported(batch));
        }
        for batch in 0..3 {
            assert_eq!(rx.try_recv().unwrap(), NotificationEvent::product_imported(batch));
        }
    }

    #[test]
    fn notify_after_dispatcher_shutdown_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelNotifier::new(tx).notify(NotificationEvent::product_imported(0));
    }
}
