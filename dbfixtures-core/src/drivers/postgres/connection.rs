//! PostgreSQL pool creation and connection string validation.

use super::{DriverConfig, PostgresDriver};
use crate::{Result, error::redact_database_url};
use sqlx::PgPool;
use url::Url;

impl PostgresDriver {
    /// Creates a PostgreSQL driver with the default configuration.
    ///
    /// The pool connects lazily, so this succeeds without a reachable server;
    /// the first truncate or insert reports connection problems.
    ///
    /// # Errors
    /// Returns error if the connection string is not a valid PostgreSQL URL
    pub fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, DriverConfig::default())
    }

    /// Creates a PostgreSQL driver with a custom configuration.
    ///
    /// # Errors
    /// Returns error if the configuration or connection string is invalid
    pub fn with_config(connection_string: &str, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        let pool = Self::create_connection_pool(connection_string, &config)?;

        Ok(Self { pool, config })
    }

    /// Checks if the database is reachable.
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(result) => result == 1,
            Err(_) => false,
        }
    }

    fn create_connection_pool(connection_string: &str, config: &DriverConfig) -> Result<PgPool> {
        Self::validate_connection_string(connection_string)?;

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_lazy(connection_string)
            .map_err(|e| {
                crate::error::DbFixturesError::connection_failed(
                    format!(
                        "Failed to create PostgreSQL connection pool to {}",
                        redact_database_url(connection_string)
                    ),
                    e,
                )
            })
    }

    /// Validates that `connection_string` is a PostgreSQL URL with a host.
    ///
    /// # Errors
    /// Returns a configuration error describing the problem; the connection
    /// string itself is never echoed back.
    pub fn validate_connection_string(connection_string: &str) -> Result<()> {
        let url = Url::parse(connection_string).map_err(|e| {
            crate::error::DbFixturesError::configuration(format!(
                "Invalid PostgreSQL connection string format: {}",
                e
            ))
        })?;

        if url.scheme() != "postgres" && url.scheme() != "postgresql" {
            return Err(crate::error::DbFixturesError::configuration(
                "Connection string must use postgres:// or postgresql:// scheme",
            ));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(crate::error::DbFixturesError::configuration(
                "PostgreSQL connection string must specify a host",
            ));
        }

        Ok(())
    }
}
