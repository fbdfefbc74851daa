//! MongoDB fixture driver.
//!
//! Tables map to collections in the database named by the connection
//! string. Rows are converted from (extended) JSON to BSON documents, so
//! `{"$oid": "..."}` and `{"$date": "..."}` values keep their BSON types.
//!
//! # MongoDB-Specific Behaviour
//! - Truncation removes every document with `deleteMany({})`; indexes and
//!   collection options are left in place
//! - `disable_foreign_keys` and `reset_sequences` have nothing to act on
//! - Rows are inserted one at a time so a failure names its row

mod connection;


use super::{Driver, DriverConfig};
use crate::{Result, error::DbFixturesError, models::Row};
use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Database};
use tracing::debug;

/// MongoDB fixture driver.
pub struct MongoDriver {
    /// MongoDB client
    pub client: Client,
    /// Database holding the fixture collections
    pub database: Database,
    pub config: DriverConfig,
}

impl std::fmt::Debug for MongoDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoDriver")
            .field("database", &self.database.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Driver<Row> for MongoDriver {
    type Error = DbFixturesError;

    async fn truncate(&self, table_names: &[String]) -> Result<()> {
        for table_name in table_names {
            let result = self
                .database
                .collection::<Document>(table_name)
                .delete_many(doc! {})
                .await
                .map_err(|e| DbFixturesError::truncate_failed(table_name, e))?;

            debug!(
                "Removed {} document(s) from '{}'",
                result.deleted_count, table_name
            );
        }

        Ok(())
    }

    async fn insert_fixtures(&self, table_name: &str, rows: &[Row]) -> Result<()> {
        if rows.is_empty() {
            debug!("No fixtures for '{}'", table_name);
            return Ok(());
        }

        let collection = self.database.collection::<Document>(table_name);
        for (index, row) in rows.iter().enumerate() {
            let document = row_document(table_name, index, row)?;
            collection
                .insert_one(document)
                .await
                .map_err(|e| DbFixturesError::insert_failed(table_name, index, e))?;
        }

        debug!("Inserted {} document(s) into '{}'", rows.len(), table_name);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

/// Converts one fixture row into a BSON document.
fn row_document(table_name: &str, index: usize, row: &Row) -> Result<Document> {
    match Bson::try_from(row.clone()) {
        Ok(Bson::Document(document)) => Ok(document),
        Ok(other) => Err(DbFixturesError::invalid_row(
            table_name,
            index,
            format!("expected a JSON object, found {:?}", other.element_type()),
        )),
        Err(e) => Err(DbFixturesError::invalid_row(
            table_name,
            index,
            e.to_string(),
        )),
    }
}
