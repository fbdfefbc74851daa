//! MySQL pool creation and connection string validation.

use super::{DriverConfig, MySqlDriver};
use crate::{Result, error::redact_database_url};
use sqlx::MySqlPool;
use url::Url;

impl MySqlDriver {
    /// Creates a MySQL driver with the default configuration.
    ///
    /// The pool connects lazily; connection problems surface on first use.
    ///
    /// # Errors
    /// Returns error if the connection string is not a valid MySQL URL
    pub fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, DriverConfig::default())
    }

    /// Creates a MySQL driver with a custom configuration.
    ///
    /// # Errors
    /// Returns error if the configuration or connection string is invalid
    pub fn with_config(connection_string: &str, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Self::validate_connection_string(connection_string)?;

        let pool: MySqlPool = sqlx::mysql::MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_lazy(connection_string)
            .map_err(|e| {
                crate::error::DbFixturesError::connection_failed(
                    format!(
                        "Failed to create MySQL connection pool to {}",
                        redact_database_url(connection_string)
                    ),
                    e,
                )
            })?;

        Ok(Self { pool, config })
    }

    /// Validates that `connection_string` is a MySQL URL naming a database.
    ///
    /// # Errors
    /// Returns a configuration error describing the problem
    pub fn validate_connection_string(connection_string: &str) -> Result<()> {
        let url = Url::parse(connection_string).map_err(|e| {
            crate::error::DbFixturesError::configuration(format!(
                "Invalid MySQL connection string format: {}",
                e
            ))
        })?;

        if url.scheme() != "mysql" {
            return Err(crate::error::DbFixturesError::configuration(
                "Connection string must use mysql:// scheme",
            ));
        }

        if url.path().trim_start_matches('/').is_empty() {
            return Err(crate::error::DbFixturesError::configuration(
                "MySQL connection string must name a database",
            ));
        }

        Ok(())
    }
}
