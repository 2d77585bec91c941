use super::ProductStore;
use crate::db::Database;
use crate::error::CatalogError;
use catalog_common::model::product::{Product, ProductInput};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

const PRODUCT_COLUMNS: &str =
    "id, sku, name, description, price, active, created_at, updated_at";

/// Largest page `list` returns.
pub const MAX_PER_PAGE: u32 = 500;

const UPSERT_SQL: &str = "
INSERT INTO products (sku, name, description, price, active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
ON CONFLICT(sku) DO UPDATE SET
    name = excluded.name,
    description = excluded.description,
    price = excluded.price,
    updated_at = excluded.updated_at";

/// One page of `GET /api/products`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u32,
}

/// Field-level edit of an existing product; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct SqliteProductStore {
    db: Database,
}

impl SqliteProductStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, id: i64) -> Result<Product, CatalogError> {
        let conn = self.db.lock()?;
        select_by_id(&conn, id)?.ok_or(CatalogError::ProductNotFound(id))
    }

    /// Inserts a brand new product; an existing SKU (any case) is rejected.
    pub fn create(&self, input: &ProductInput) -> Result<Product, CatalogError> {
        let conn = self.db.lock()?;
        if select_by_sku(&conn, &input.sku)?.is_some() {
            return Err(CatalogError::DuplicateSku(input.sku.clone()));
        }
        let now = Utc::now();
        conn.execute(
            "INSERT INTO products (sku, name, description, price, active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                input.sku,
                input.name,
                input.description,
                input.price.to_string(),
                input.active,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        select_by_id(&conn, id)?.ok_or(CatalogError::ProductNotFound(id))
    }

    pub fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, CatalogError> {
        let conn = self.db.lock()?;
        let current = select_by_id(&conn, id)?.ok_or(CatalogError::ProductNotFound(id))?;
        let price = patch.price.map(|p| p.round_dp(2)).unwrap_or(current.price);
        conn.execute(
            "UPDATE products SET name = ?1, description = ?2, price = ?3, active = ?4, \
             updated_at = ?5 WHERE id = ?6",
            params![
                patch.name.unwrap_or(current.name),
                patch.description.or(current.description),
                price.to_string(),
                patch.active.unwrap_or(current.active),
                Utc::now(),
                id
            ],
        )?;
        select_by_id(&conn, id)?.ok_or(CatalogError::ProductNotFound(id))
    }

    /// Newest first, `page` is 1-based. `per_page` is capped at
    /// [`MAX_PER_PAGE`].
    pub fn list(&self, page: u32, per_page: u32) -> Result<ProductPage, CatalogError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let offset = i64::from(page - 1).saturating_mul(i64::from(per_page));

        let conn = self.db.lock()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        let total = total.max(0) as u64;

        let mut stmt = conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let products = stmt
            .query_map(params![i64::from(per_page), offset], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductPage {
            products,
            total,
            pages: total.div_ceil(u64::from(per_page)),
            current_page: page,
        })
    }
}

impl ProductStore for SqliteProductStore {
    fn find_by_key_ci(&self, sku: &str) -> Result<Option<Product>, CatalogError> {
        let conn = self.db.lock()?;
        select_by_sku(&conn, sku)
    }

    fn upsert(&self, input: &ProductInput) -> Result<Product, CatalogError> {
        let conn = self.db.lock()?;
        upsert_one(&conn, input)?;
        select_by_sku(&conn, &input.sku)?
            .ok_or_else(|| CatalogError::Database(rusqlite::Error::QueryReturnedNoRows))
    }

    fn upsert_batch(&self, inputs: &[ProductInput]) -> Result<usize, CatalogError> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;
        for input in inputs {
            upsert_one(&tx, input)?;
        }
        tx.commit()?;
        Ok(inputs.len())
    }

    fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let conn = self.db.lock()?;
        match conn.execute("DELETE FROM products WHERE id = ?1", params![id])? {
            0 => Err(CatalogError::ProductNotFound(id)),
            _ => Ok(()),
        }
    }

    fn delete_all(&self) -> Result<usize, CatalogError> {
        let conn = self.db.lock()?;
        Ok(conn.execute("DELETE FROM products", [])?)
    }
}

fn upsert_one(conn: &Connection, input: &ProductInput) -> Result<(), CatalogError> {
    conn.prepare_cached(UPSERT_SQL)?.execute(params![
        input.sku,
        input.name,
        input.description,
        input.price.to_string(),
        input.active,
        Utc::now()
    ])?;
    Ok(())
}

fn select_by_id(conn: &Connection, id: i64) -> Result<Option<Product>, CatalogError> {
    Ok(conn
        .query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
            params![id],
            product_from_row,
        )
        .optional()?)
}

fn select_by_sku(conn: &Connection, sku: &str) -> Result<Option<Product>, CatalogError> {
    Ok(conn
        .query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1 COLLATE NOCASE"),
            params![sku.trim()],
            product_from_row,
        )
        .optional()?)
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let price: String = row.get(4)?;
    let price = Decimal::from_str(&price)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Product {
        id: row.get(0)?,
        sku: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        price,
        active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
