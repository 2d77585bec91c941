use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payload of `POST /api/products`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Payload of `PUT /api/products/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

/// Payload of `POST /api/webhooks`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateWebhookRequest {
    pub url: String,
    pub event_type: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Payload of `PUT /api/webhooks/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateWebhookRequest {
    pub url: Option<String>,
    pub event_type: Option<String>,
    pub enabled: Option<bool>,
}

/// Query string of `GET /api/products`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}
