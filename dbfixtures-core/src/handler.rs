//! Cross-driver fixture orchestration.
//!
//! [`FixtureHandler`] holds an ordered list of drivers and runs the same
//! truncate-then-insert sequence against each of them, one operation at a
//! time. The first failure stops everything and is returned as the driver
//! produced it.
//!
//! # Lifecycle
//! Calling [`FixtureHandler::insert_fixtures`] after
//! [`FixtureHandler::close_drivers`], or calling `close_drivers` more than
//! once, is undefined: the handler tracks no lifecycle state and simply
//! forwards the calls, so the outcome is whatever each driver does with
//! them.


use crate::drivers::Driver;
use crate::error::DbFixturesError;
use crate::models::Row;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Seeds every registered driver with the same fixtures.
///
/// Generic over the row type `R` and the error type `E` shared by its
/// drivers. The defaults match the drivers bundled with this crate.
///
/// # Example
/// ```rust,no_run
/// use dbfixtures_core::{DriverConfig, FixtureHandler, create_driver};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// # async fn example() -> dbfixtures_core::Result<()> {
/// let driver = create_driver("sqlite://fixtures.db", &DriverConfig::default()).await?;
/// let handler = FixtureHandler::new(vec![driver]);
///
/// let tables = vec!["users".to_string()];
/// let fixtures = HashMap::from([("users".to_string(), vec![json!({"name": "ada"})])]);
///
/// handler.insert_fixtures(&tables, &fixtures).await?;
/// handler.close_drivers().await?;
/// # Ok(())
/// # }
/// ```
pub struct FixtureHandler<R = Row, E = DbFixturesError>
where
    R: Send + Sync,
{
    drivers: Vec<Box<dyn Driver<R, Error = E>>>,
}

impl<R, E> FixtureHandler<R, E>
where
    R: Send + Sync,
{
    /// Creates a handler over `drivers`, kept in the given order.
    ///
    /// An empty list is valid; every operation then succeeds without doing
    /// anything.
    pub fn new(drivers: Vec<Box<dyn Driver<R, Error = E>>>) -> Self {
        Self { drivers }
    }

    /// Number of registered drivers.
    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    /// Truncates `table_names` and inserts their fixtures on every driver.
    ///
    /// For each driver in registration order, `truncate` is called once with
    /// the whole list, then `insert_fixtures` once per table in list order.
    /// A table with no entry in `fixtures` gets an empty row slice.
    ///
    /// Drivers before a failing one are fully seeded, the failing one may be
    /// partially seeded and the ones after it are not touched.
    ///
    /// # Errors
    /// Returns the first truncate or insert error, unchanged
    pub async fn insert_fixtures(
        &self,
        table_names: &[String],
        fixtures: &HashMap<String, Vec<R>>,
    ) -> Result<(), E> {
        for (index, driver) in self.drivers.iter().enumerate() {
            debug!(
                "Truncating {} table(s) on driver {}",
                table_names.len(),
                index
            );
            if let Err(e) = driver.truncate(table_names).await {
                warn!("Truncate failed on driver {}", index);
                return Err(e);
            }

            for table_name in table_names {
                let rows = fixtures.get(table_name).map_or(&[][..], Vec::as_slice);
                debug!(
                    "Inserting {} row(s) into '{}' on driver {}",
                    rows.len(),
                    table_name,
                    index
                );
                if let Err(e) = driver.insert_fixtures(table_name, rows).await {
                    warn!("Insert into '{}' failed on driver {}", table_name, index);
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Closes every driver in registration order.
    ///
    /// # Errors
    /// Returns the first close error, unchanged; later drivers stay open
    pub async fn close_drivers(&self) -> Result<(), E> {
        for (index, driver) in self.drivers.iter().enumerate() {
            debug!("Closing driver {}", index);
            if let Err(e) = driver.close().await {
                warn!("Close failed on driver {}", index);
                return Err(e);
            }
        }

        Ok(())
    }
}

impl<R, E> std::fmt::Debug for FixtureHandler<R, E>
where
    R: Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureHandler")
            .field("driver_count", &self.drivers.len())
            .finish()
    }
}
