//! Driver configuration.
//!
//! # Security
//! This struct intentionally does NOT store passwords or credentials. Those
//! stay inside the connection string, which is redacted wherever it is logged.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the bundled drivers.
///
/// # Example
/// ```rust
/// use dbfixtures_core::drivers::DriverConfig;
/// use std::time::Duration;
///
/// let config = DriverConfig::new()
///     .with_connect_timeout(Duration::from_secs(5))
///     .with_max_connections(2)
///     .with_reset_sequences(false);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// How long to wait for a connection before giving up
    pub connect_timeout: Duration,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Suspend foreign key enforcement while truncating.
    ///
    /// MySQL toggles `FOREIGN_KEY_CHECKS`, SQLite toggles
    /// `PRAGMA foreign_keys`, PostgreSQL truncates with `CASCADE`.
    /// MongoDB has no foreign keys and ignores this.
    pub disable_foreign_keys: bool,
    /// Restart identity / auto-increment counters when truncating
    pub reset_sequences: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_connections: 5,
            disable_foreign_keys: true,
            reset_sequences: true,
        }
    }
}

impl DriverConfig {
    /// Creates a config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates configuration parameters.
    ///
    /// # Errors
    /// Returns a configuration error if any value is out of range
    pub fn validate(&self) -> crate::Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(crate::error::DbFixturesError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.max_connections == 0 {
            return Err(crate::error::DbFixturesError::configuration(
                "max_connections must be greater than 0",
            ));
        }

        if self.max_connections > 100 {
            return Err(crate::error::DbFixturesError::configuration(
                "max_connections should not exceed 100",
            ));
        }

        Ok(())
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Builder method to toggle foreign key suspension during truncation.
    pub fn with_disable_foreign_keys(mut self, disable: bool) -> Self {
        self.disable_foreign_keys = disable;
        self
    }

    /// Builder method to toggle sequence resets during truncation.
    pub fn with_reset_sequences(mut self, reset: bool) -> Self {
        self.reset_sequences = reset;
        self
    }
}
