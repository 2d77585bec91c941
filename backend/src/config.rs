//! Runtime configuration read from the environment (and an optional `.env`).

use crate::error::CatalogError;
use crate::notifications::DELIVERY_TIMEOUT;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://products.sqlite";
pub const DEFAULT_UPLOAD_LIMIT_MB: usize = 50;
const MB: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite file, or `:memory:`.
    pub database_path: String,
    pub webhook_timeout: Duration,
    pub batch_size: usize,
    pub upload_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: database_path_from_url(DEFAULT_DATABASE_URL),
            webhook_timeout: DELIVERY_TIMEOUT,
            batch_size: crate::ingest::BATCH_SIZE,
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_MB * MB,
        }
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, CatalogError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = parse_or(&lookup, "PORT", defaults.port)?;
        let timeout_secs = parse_or(&lookup, "WEBHOOK_TIMEOUT_SECS", defaults.webhook_timeout.as_secs())?;
        let batch_size = parse_or(&lookup, "INGEST_BATCH_SIZE", defaults.batch_size)?;
        if batch_size == 0 {
            return Err(CatalogError::Config(
                "INGEST_BATCH_SIZE must be greater than zero".to_string(),
            ));
        }
        let upload_limit_mb = parse_or(&lookup, "UPLOAD_LIMIT_MB", DEFAULT_UPLOAD_LIMIT_MB)?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            database_path: lookup("DATABASE_URL")
                .map(|url| database_path_from_url(&url))
                .unwrap_or(defaults.database_path),
            webhook_timeout: Duration::from_secs(timeout_secs),
            batch_size,
            upload_limit_bytes: upload_limit_mb * MB,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CatalogError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CatalogError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

/// Accepts `sqlite://path`, `sqlite:///path` or a bare path.
fn database_path_from_url(url: &str) -> String {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if path.is_empty() {
        ":memory:".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_path, "products.sqlite");
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.webhook_timeout, DELIVERY_TIMEOUT);
        assert_eq!(config.upload_limit_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DATABASE_URL", "sqlite:///var/lib/catalog.db"),
            ("WEBHOOK_TIMEOUT_SECS", "2"),
            ("INGEST_BATCH_SIZE", "250"),
        ]))
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, "/var/lib/catalog.db");
        assert_eq!(config.webhook_timeout, Duration::from_secs(2));
        assert_eq!(config.batch_size, 250);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
        let err = AppConfig::from_lookup(lookup_from(&[("INGEST_BATCH_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn bare_paths_are_accepted() {
        assert_eq!(database_path_from_url("catalog.db"), "catalog.db");
        assert_eq!(database_path_from_url("sqlite://"), ":memory:");
    }
}
