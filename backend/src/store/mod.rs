//! Durable product storage.
//!
//! [`ProductStore`] is the narrow surface the ingestion worker depends on.
//! [`SqliteProductStore`] implements it over the shared [`Database`](crate::db::Database)
//! and adds the plain CRUD used by the HTTP layer.

mod products;

pub use products::{ProductPage, ProductPatch, SqliteProductStore};

use crate::error::CatalogError;
use catalog_common::model::product::{Product, ProductInput};

pub trait ProductStore: Send + Sync {
    /// Looks a product up by SKU, ignoring case.
    fn find_by_key_ci(&self, sku: &str) -> Result<Option<Product>, CatalogError>;

    /// Creates the product or overwrites name, description and price of the
    /// existing one. `active`, `sku` and `created_at` of an existing product
    /// are left alone.
    fn upsert(&self, input: &ProductInput) -> Result<Product, CatalogError>;

    /// Upserts every input in a single transaction. Returns the number of
    /// rows written.
    fn upsert_batch(&self, inputs: &[ProductInput]) -> Result<usize, CatalogError>;

    fn delete(&self, id: i64) -> Result<(), CatalogError>;

    /// Removes every product, returning how many were deleted.
    fn delete_all(&self) -> Result<usize, CatalogError>;
}
