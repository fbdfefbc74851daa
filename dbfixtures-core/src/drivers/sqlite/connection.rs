//! SQLite connection handling.
//!
//! # Connection Modes
//! - File-based: `sqlite:///path/to/database.db`, `sqlite://./relative.db`
//!   or a bare path ending in `.db`, `.sqlite` or `.sqlite3`
//! - In-memory: `sqlite::memory:` or `:memory:`
//!
//! File databases are created if missing. An in-memory database lives only
//! as long as its connection, so the pool is pinned to one connection that
//! never expires.

use super::{DriverConfig, SqliteDriver};
use crate::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

impl SqliteDriver {
    /// Creates a SQLite driver with the default configuration.
    ///
    /// # Errors
    /// Returns error if the connection string is invalid or the database
    /// cannot be opened
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, DriverConfig::default()).await
    }

    /// Creates a SQLite driver with a custom configuration.
    ///
    /// # Errors
    /// Returns error if the configuration or connection string is invalid, or
    /// the database cannot be opened
    pub async fn with_config(connection_string: &str, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        validate_sqlite_connection_string(connection_string)?;
        let pool = create_sqlite_pool(connection_string, &config).await?;

        Ok(Self {
            pool,
            config,
            connection_string: connection_string.to_string(),
        })
    }

    /// Checks if the connection is to an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        is_in_memory(&self.connection_string)
    }
}

fn is_in_memory(connection_string: &str) -> bool {
    connection_string.contains(":memory:") || connection_string.contains("mode=memory")
}

/// Validates SQLite connection string format.
///
/// # Errors
/// Returns error if connection string is invalid
pub fn validate_sqlite_connection_string(connection_string: &str) -> Result<()> {
    if connection_string == ":memory:"
        || connection_string.starts_with("sqlite:")
        || connection_string.ends_with(".db")
        || connection_string.ends_with(".sqlite")
        || connection_string.ends_with(".sqlite3")
    {
        return Ok(());
    }

    Err(crate::error::DbFixturesError::configuration(
        "Invalid SQLite connection string format: expected sqlite:// URL, file path, or :memory:",
    ))
}

/// Normalizes connection string to SQLite URL format.
pub(crate) fn normalize_connection_string(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        return "sqlite::memory:".to_string();
    }

    if connection_string.starts_with("sqlite:") {
        return connection_string.to_string();
    }

    format!("sqlite://{}", connection_string)
}

async fn create_sqlite_pool(connection_string: &str, config: &DriverConfig) -> Result<SqlitePool> {
    let normalized = normalize_connection_string(connection_string);

    let options = SqliteConnectOptions::from_str(&normalized)
        .map_err(|e| {
            crate::error::DbFixturesError::configuration(format!(
                "Invalid SQLite connection string: {}",
                e
            ))
        })?
        .create_if_missing(true);

    let pool_options = SqlitePoolOptions::new().acquire_timeout(config.connect_timeout);
    let pool_options = if is_in_memory(connection_string) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    pool_options.connect_with(options).await.map_err(|e| {
        crate::error::DbFixturesError::connection_failed("Failed to open SQLite database", e)
    })
}
