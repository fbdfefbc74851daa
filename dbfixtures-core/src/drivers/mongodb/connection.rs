//! MongoDB client creation and connection string validation.
//!
//! Creating a client does not contact the server; the first operation does.

use super::{DriverConfig, MongoDriver};
use crate::Result;
use crate::error::redact_database_url;
use mongodb::Client;
use mongodb::options::ClientOptions;
use url::Url;

impl MongoDriver {
    /// Creates a MongoDB driver with the default configuration.
    ///
    /// # Errors
    /// Returns error if the connection string is invalid or names no database
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, DriverConfig::default()).await
    }

    /// Creates a MongoDB driver with a custom configuration.
    ///
    /// The database comes from the path of the connection string, e.g.
    /// `mongodb://localhost:27017/app_test`.
    ///
    /// # Errors
    /// Returns error if:
    /// - The configuration or connection string is invalid
    /// - The connection string names no database
    /// - Client creation fails
    pub async fn with_config(connection_string: &str, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Self::validate_connection_string(connection_string)?;

        let options = create_client_options(connection_string, &config).await?;
        let database_name = options.default_database.clone().ok_or_else(|| {
            crate::error::DbFixturesError::configuration(
                "MongoDB connection string must name a database",
            )
        })?;

        let client = Client::with_options(options).map_err(|e| {
            crate::error::DbFixturesError::connection_failed(
                format!(
                    "Failed to create MongoDB client for {}",
                    redact_database_url(connection_string)
                ),
                e,
            )
        })?;
        let database = client.database(&database_name);

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Validates a MongoDB connection string.
    ///
    /// # Errors
    /// Returns a configuration error if the scheme or host is missing
    pub fn validate_connection_string(connection_string: &str) -> Result<()> {
        let url = Url::parse(connection_string).map_err(|e| {
            crate::error::DbFixturesError::configuration(format!(
                "Invalid MongoDB connection string format: {}",
                e
            ))
        })?;

        if !matches!(url.scheme(), "mongodb" | "mongodb+srv") {
            return Err(crate::error::DbFixturesError::configuration(
                "Connection string must use mongodb:// or mongodb+srv:// scheme",
            ));
        }

        if url.host_str().is_none() {
            return Err(crate::error::DbFixturesError::configuration(
                "Connection string must specify a host",
            ));
        }

        Ok(())
    }
}

async fn create_client_options(
    connection_string: &str,
    config: &DriverConfig,
) -> Result<ClientOptions> {
    let mut options = ClientOptions::parse(connection_string).await.map_err(|e| {
        crate::error::DbFixturesError::configuration(format!(
            "Failed to parse MongoDB connection options: {}",
            e
        ))
    })?;

    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.connect_timeout);
    options.max_pool_size = Some(config.max_connections);
    options.app_name = Some(format!("dbfixtures-{}", env!("CARGO_PKG_VERSION")));

    Ok(options)
}
