//! MySQL fixture driver.
//!
//! # MySQL-Specific Behaviour
//! - `TRUNCATE TABLE` is DDL and commits implicitly, so the batch is not
//!   atomic; tables are cleared one at a time on a single connection
//! - With `reset_sequences` off, `DELETE FROM` is used instead, since
//!   `TRUNCATE` always resets `AUTO_INCREMENT`
//! - `FOREIGN_KEY_CHECKS` is session-scoped and restored on the same
//!   connection before it goes back to the pool
//! - Integers above `i64::MAX` bind as `u64` for `BIGINT UNSIGNED` columns

mod connection;


use super::helpers::{SqlDialect, bind_json_value, row_object};
use super::{Driver, DriverConfig};
use crate::{Result, error::DbFixturesError, models::Row};
use async_trait::async_trait;
use sqlx::{MySqlConnection, MySqlPool};
use tracing::debug;

/// MySQL fixture driver backed by a lazily connected pool.
pub struct MySqlDriver {
    pub pool: MySqlPool,
    pub config: DriverConfig,
}

impl std::fmt::Debug for MySqlDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlDriver")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .field("pool_idle", &self.pool.num_idle())
            .finish()
    }
}

#[async_trait]
impl Driver<Row> for MySqlDriver {
    type Error = DbFixturesError;

    async fn truncate(&self, table_names: &[String]) -> Result<()> {
        if table_names.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.acquire().await.map_err(|e| {
            DbFixturesError::connection_failed("Failed to acquire MySQL connection", e)
        })?;

        if self.config.disable_foreign_keys {
            set_foreign_key_checks(&mut conn, false).await?;
        }

        let mut result = Ok(());
        for table_name in table_names {
            let statement = clear_statement(table_name, &self.config);
            if let Err(e) = sqlx::query(&statement).execute(&mut *conn).await {
                result = Err(DbFixturesError::truncate_failed(table_name, e));
                break;
            }
        }

        if self.config.disable_foreign_keys {
            let restored = set_foreign_key_checks(&mut conn, true).await;
            result?;
            restored?;
        } else {
            result?;
        }

        debug!("Truncated {} MySQL table(s)", table_names.len());
        Ok(())
    }

    async fn insert_fixtures(&self, table_name: &str, rows: &[Row]) -> Result<()> {
        if rows.is_empty() {
            debug!("No fixtures for '{}'", table_name);
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DbFixturesError::connection_failed("Failed to begin MySQL transaction", e)
        })?;

        for (index, row) in rows.iter().enumerate() {
            let columns = row_object(table_name, index, row)?;
            let statement = SqlDialect::MySql.insert_statement(table_name, columns.keys());

            let mut query = sqlx::query(&statement);
            for value in columns.values() {
                query = bind_json_value!(query, value, unsigned);
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

/// Statement that empties one table.
fn clear_statement(table_name: &str, config: &DriverConfig) -> String {
    let table = SqlDialect::MySql.quote_identifier(table_name);
    if config.reset_sequences {
        format!("TRUNCATE TABLE {table}")
    } else {
        format!("DELETE FROM {table}")
    }
}

async fn set_foreign_key_checks(conn: &mut MySqlConnection, enabled: bool) -> Result<()> {
    let statement = if enabled {
        "SET FOREIGN_KEY_CHECKS = 1"
    } else {
        "SET FOREIGN_KEY_CHECKS = 0"
    };

    sqlx::query(statement)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbFixturesError::connection_failed("Failed to toggle MySQL foreign key checks", e)
        })?;

    Ok(())
}
