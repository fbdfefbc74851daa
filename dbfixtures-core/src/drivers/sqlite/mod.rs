//! SQLite fixture driver.
//!
//! # Module Structure
//! - `connection`: Connection handling (file-based and in-memory databases)
//!
//! # SQLite-Specific Behaviour
//! - SQLite has no `TRUNCATE`; tables are cleared with `DELETE FROM` inside
//!   one transaction, so the batch is atomic
//! - `PRAGMA foreign_keys` is a no-op inside a transaction, so it is toggled
//!   on the same connection before `BEGIN` and restored afterwards
//! - Auto-increment counters live in `sqlite_sequence`, which only exists
//!   once an `AUTOINCREMENT` table has been created

mod connection;


use super::helpers::{SqlDialect, bind_json_value, row_object};
use super::{Driver, DriverConfig};
use crate::{Result, error::DbFixturesError, models::Row};
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

/// SQLite fixture driver.
pub struct SqliteDriver {
    /// Connection pool (a single connection for in-memory databases)
    pub pool: SqlitePool,
    /// Driver configuration
    pub config: DriverConfig,
    connection_string: String,
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("config", &self.config)
            .field("is_in_memory", &self.is_in_memory())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Driver<Row> for SqliteDriver {
    type Error = DbFixturesError;

    async fn truncate(&self, table_names: &[String]) -> Result<()> {
        if table_names.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.acquire().await.map_err(|e| {
            DbFixturesError::connection_failed("Failed to acquire SQLite connection", e)
        })?;

        if self.config.disable_foreign_keys {
            set_foreign_keys(&mut conn, false).await?;
        }

        let result = self.delete_all(&mut conn, table_names).await;

        if self.config.disable_foreign_keys {
            let restored = set_foreign_keys(&mut conn, true).await;
            // The delete error takes precedence over a failed restore.
            result?;
            restored?;
        } else {
            result?;
        }

        debug!("Truncated {} SQLite table(s)", table_names.len());
        Ok(())
    }

    async fn insert_fixtures(&self, table_name: &str, rows: &[Row]) -> Result<()> {
        if rows.is_empty() {
            debug!("No fixtures for '{}'", table_name);
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DbFixturesError::connection_failed("Failed to begin SQLite transaction", e)
        })?;

        for (index, row) in rows.iter().enumerate() {
            let columns = row_object(table_name, index, row)?;
            let statement = SqlDialect::Ansi.insert_statement(table_name, columns.keys());

            let mut query = sqlx::query(&statement);
            for value in columns.values() {
                query = bind_json_value!(query, value);
            }

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

impl SqliteDriver {
    /// Clears every table in one transaction on `conn`.
    async fn delete_all(&self, conn: &mut SqliteConnection, table_names: &[String]) -> Result<()> {
        let joined = || table_names.join(", ");

        let mut tx = sqlx::Connection::begin(&mut *conn)
            .await
            .map_err(|e| DbFixturesError::truncate_failed(joined(), e))?;

        for table_name in table_names {
            let statement = format!(
                "DELETE FROM {}",
                SqlDialect::Ansi.quote_identifier(table_name)
            );
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbFixturesError::truncate_failed(table_name, e))?;
        }

        if self.config.reset_sequences {
            for table_name in table_names {
                reset_sequence(&mut *tx, table_name)
                    .await
                    .map_err(|e| DbFixturesError::truncate_failed(table_name, e))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbFixturesError::truncate_failed(joined(), e))
    }
}

/// Drops the `AUTOINCREMENT` counter of one table.
///
/// Counters are keyed by the bare table name in the `sqlite_sequence` table
/// of the table's own schema, which only exists once that schema has an
/// `AUTOINCREMENT` table.
async fn reset_sequence(conn: &mut SqliteConnection, table_name: &str) -> sqlx::Result<()> {
    let (schema, table) = match table_name.rsplit_once('.') {
        Some((schema, table)) => (
            format!("{}.", SqlDialect::Ansi.quote_identifier(schema)),
            table,
        ),
        None => (String::new(), table_name),
    };

    let has_sequences: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {schema}sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'"
    ))
    .fetch_one(&mut *conn)
    .await?;

    if has_sequences > 0 {
        sqlx::query(&format!("DELETE FROM {schema}sqlite_sequence WHERE name = ?"))
            .bind(table)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

async fn set_foreign_keys(conn: &mut SqliteConnection, enabled: bool) -> Result<()> {
    let statement = if enabled {
        "PRAGMA foreign_keys = ON"
    } else {
        "PRAGMA foreign_keys = OFF"
    };

    sqlx::query(statement)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbFixturesError::connection_failed("Failed to toggle SQLite foreign key enforcement", e)
        })?;

    Ok(())
}
