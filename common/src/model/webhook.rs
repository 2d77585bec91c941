use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event type emitted once per committed ingestion batch.
pub const PRODUCT_IMPORTED: &str = "product.imported";

/// A registered outbound callback, filtered by exact event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: i64,
    pub url: String,
    pub event_type: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single synchronous test delivery.
///
/// `success` means an HTTP response came back, whatever its status; the
/// status code is reported alongside so the caller can judge it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDeliveryReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Elapsed seconds between sending the request and receiving the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestDeliveryReport {
    pub fn delivered(status_code: u16, response_time: f64) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            response_time: Some(response_time),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: None,
            response_time: None,
            error: Some(error.into()),
        }
    }
}
