//! PostgreSQL fixture driver.
//!
//! # Module Structure
//! - `connection`: Pool creation and connection string validation
//!
//! # Behaviour
//! - Truncation is a single `TRUNCATE TABLE a, b, ...` statement, so the
//!   whole batch is atomic
//! - Each row is inserted through `json_populate_record`, which lets the
//!   server coerce JSON values into the declared column types
//! - All inserts for one table run in one transaction

mod connection;

#[cfg(test)]
mod tests;

use super::helpers::{SqlDialect, row_object};
use super::{Driver, DriverConfig};
use crate::{Result, error::DbFixturesError, models::Row};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// PostgreSQL fixture driver backed by a lazily connected pool.
pub struct PostgresDriver {
    pub pool: PgPool,
    pub config: DriverConfig,
}

impl std::fmt::Debug for PostgresDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDriver")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .field("pool_idle", &self.pool.num_idle())
            .finish()
    }
}

#[async_trait]
impl Driver<Row> for PostgresDriver {
    type Error = DbFixturesError;

    async fn truncate(&self, table_names: &[String]) -> Result<()> {
        if table_names.is_empty() {
            return Ok(());
        }

        let statement = truncate_statement(table_names, &self.config);
        debug!("Truncating {} PostgreSQL table(s)", table_names.len());

        sqlx::query(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| DbFixturesError::truncate_failed(table_names.join(", "), e))?;

        Ok(())
    }

    async fn insert_fixtures(&self, table_name: &str, rows: &[Row]) -> Result<()> {
        if rows.is_empty() {
            debug!("No fixtures for '{}'", table_name);
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DbFixturesError::connection_failed("Failed to begin PostgreSQL transaction", e)
        })?;

        for (index, row) in rows.iter().enumerate() {
            let columns = row_object(table_name, index, row)?;
            let statement = insert_statement(table_name, columns.keys());

            let query = sqlx::query(&statement);
            let query = if columns.is_empty() {
                query
            } else {
                query.bind(row.to_string())
            };

            query
                .execute(&mut *tx)
                .await
                .map_err(|e| DbFixturesError::insert_failed(table_name, index, e))?;
        }

        tx.commit().await.map_err(|e| {
            DbFixturesError::connection_failed(
                format!("Failed to commit fixtures for '{}'", table_name),
                e,
            )
        })?;

        debug!("Inserted {} row(s) into '{}'", rows.len(), table_name);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Builds the batch `TRUNCATE` statement for `table_names`.
fn truncate_statement(table_names: &[String], config: &DriverConfig) -> String {
    let tables = table_names
        .iter()
        .map(|name| SqlDialect::Ansi.quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ");

    let identity = if config.reset_sequences {
        " RESTART IDENTITY"
    } else {
        ""
    };
    let cascade = if config.disable_foreign_keys {
        " CASCADE"
    } else {
        ""
    };

    format!("TRUNCATE TABLE {tables}{identity}{cascade}")
}

/// Builds an insert that reads one JSON row through `json_populate_record`.
///
/// Only the columns present in the row are written, so omitted columns keep
/// their defaults. An empty column list inserts a row of defaults.
fn insert_statement<'a>(
    table_name: &str,
    columns: impl ExactSizeIterator<Item = &'a String>,
) -> String {
    let table = SqlDialect::Ansi.quote_identifier(table_name);

    if columns.len() == 0 {
        return format!("INSERT INTO {table} DEFAULT VALUES");
    }

    let column_list = columns
        .map(|column| SqlDialect::Ansi.quote_column(column))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {table} ({column_list}) SELECT {column_list} FROM json_populate_record(NULL::{table}, $1::json)"
    )
}
