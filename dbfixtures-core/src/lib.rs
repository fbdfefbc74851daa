//! Deterministic database fixtures for tests.
//!
//! A [`FixtureHandler`] owns an ordered list of drivers. Each call to
//! [`FixtureHandler::insert_fixtures`] truncates the named tables on every
//! driver and re-inserts the given rows, so each test starts from a known
//! state. Drivers are anything implementing [`Driver`]; the ones bundled
//! here are selected by connection string through [`create_driver`].
//!
//! # Failure Semantics
//! - Work is strictly sequential: driver by driver, truncate before inserts,
//!   tables in the order given
//! - The first failing operation ends the call and its error is returned
//!   unchanged; there is no rollback across drivers
//!
//! # Security Guarantees
//! - Connection strings are redacted in every error message and log line
//! - Driver configuration never holds credentials
//!
//! # Feature Flags
//! - `postgresql` (default), `sqlite` (default), `mysql`, `mongodb`: bundled
//!   drivers

pub mod drivers;
pub mod error;
pub mod fixtures;
pub mod handler;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use drivers::{BoxedDriver, Driver, DriverConfig, create_driver, detect_database_type};
pub use error::{DbFixturesError, Result};
pub use fixtures::FixtureFile;
pub use handler::FixtureHandler;
pub use logging::init_logging;
pub use models::{DatabaseType, Row};
