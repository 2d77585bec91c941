//! The `webhooks` table.

use crate::db::Database;
use crate::error::CatalogError;
use catalog_common::model::webhook::Webhook;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const WEBHOOK_COLUMNS: &str = "id, url, event_type, enabled, created_at";

/// Read side used by the dispatcher.
pub trait WebhookRegistry: Send + Sync {
    /// Enabled webhooks whose event type equals `event_type` exactly.
    fn list_enabled(&self, event_type: &str) -> Result<Vec<Webhook>, CatalogError>;
}

/// Field-level edit of a webhook; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct WebhookPatch {
    pub url: Option<String>,
    pub event_type: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Clone)]
pub struct SqliteWebhookRegistry {
    db: Database,
}

impl SqliteWebhookRegistry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, url: &str, event_type: &str, enabled: bool) -> Result<Webhook, CatalogError> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO webhooks (url, event_type, enabled, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![url, event_type, enabled, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();
        select(&conn, id)?.ok_or(CatalogError::WebhookNotFound(id))
    }

    pub fn get(&self, id: i64) -> Result<Webhook, CatalogError> {
        let conn = self.db.lock()?;
        select(&conn, id)?.ok_or(CatalogError::WebhookNotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Webhook>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {WEBHOOK_COLUMNS} FROM webhooks ORDER BY id"))?;
        let webhooks = stmt
            .query_map([], webhook_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(webhooks)
    }

    pub fn update(&self, id: i64, patch: WebhookPatch) -> Result<Webhook, CatalogError> {
        let conn = self.db.lock()?;
        let current = select(&conn, id)?.ok_or(CatalogError::WebhookNotFound(id))?;
        conn.execute(
            "UPDATE webhooks SET url = ?1, event_type = ?2, enabled = ?3 WHERE id = ?4",
            params![
                patch.url.unwrap_or(current.url),
                patch.event_type.unwrap_or(current.event_type),
                patch.enabled.unwrap_or(current.enabled),
                id
            ],
        )?;
        select(&conn, id)?.ok_or(CatalogError::WebhookNotFound(id))
    }

    pub fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let conn = self.db.lock()?;
        match conn.execute("DELETE FROM webhooks WHERE id = ?1", params![id])? {
            0 => Err(CatalogError::WebhookNotFound(id)),
            _ => Ok(()),
        }
    }
}

impl WebhookRegistry for SqliteWebhookRegistry {
    fn list_enabled(&self, event_type: &str) -> Result<Vec<Webhook>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {WEBHOOK_COLUMNS} FROM webhooks WHERE event_type = ?1 AND enabled = 1 ORDER BY id"
        ))?;
        let webhooks = stmt
            .query_map(params![event_type], webhook_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(webhooks)
    }
}

fn select(conn: &Connection, id: i64) -> Result<Option<Webhook>, CatalogError> {
    Ok(conn
        .query_row(
            &format!("SELECT {WEBHOOK_COLUMNS} FROM webhooks WHERE id = ?1"),
            params![id],
            webhook_from_row,
        )
        .optional()?)
}

fn webhook_from_row(row: &Row<'_>) -> rusqlite::Result<Webhook> {
    Ok(Webhook {
        id: row.get(0)?,
        url: row.get(1)?,
        event_type: row.get(2)?,
        enabled: row.get(3)?,
        created_at: row.get(4)?,
    })
}
