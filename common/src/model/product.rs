use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry as stored in the `products` table.
///
/// `sku` is the natural key. It is stored lowercased and compared
/// case-insensitively, so `ABC-1` and `abc-1` name the same product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    /// Fixed-point price with two decimal places.
    pub price: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mutable fields written by an upsert.
///
/// `active` is only consulted when the product does not exist yet; an upsert
/// over an existing product never changes its active flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub active: bool,
}

impl ProductInput {
    /// Builds an input from a raw key, returning `None` when the key is blank.
    pub fn new(
        raw_sku: &str,
        name: impl Into<String>,
        description: Option<String>,
        price: Decimal,
    ) -> Option<Self> {
        Some(Self {
            sku: normalize_sku(raw_sku)?,
            name: name.into(),
            description,
            price: price.round_dp(2),
            active: true,
        })
    }
}

/// Trims and lowercases a SKU. Blank keys yield `None`.
pub fn normalize_sku(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sku_trims_and_lowercases() {
        assert_eq!(normalize_sku("  AbC-01 "), Some("abc-01".to_string()));
    }

    #[test]
    fn normalize_sku_rejects_blank_keys() {
        assert_eq!(normalize_sku(""), None);
        assert_eq!(normalize_sku(" \t "), None);
    }

    #[test]
    fn product_input_rounds_price_to_cents() {
        let input = ProductInput::new("X1", "Widget", None, Decimal::new(19999, 3)).unwrap();
        assert_eq!(input.price, Decimal::new(2000, 2));
        assert!(input.active);
    }
}
