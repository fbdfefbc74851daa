//! Library module for dbfixtures-seed
//!
//! This module exposes the CLI definition and the seeding workflow for
//! testing purposes. The binary entry point is in main.rs.

use clap::{Args, Parser};
use dbfixtures_core::{
    BoxedDriver, DatabaseType, DriverConfig, FixtureFile, FixtureHandler, Result, Row,
    create_driver,
    error::{DbFixturesError, redact_database_url},
};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "dbfixtures-seed")]
#[command(about = "Truncate tables and load JSON fixtures into databases")]
#[command(version)]
#[command(long_about = "
dbfixtures-seed - Deterministic database fixtures

Truncates the fixture tables in every given database, then inserts the rows
from a JSON fixture file. Databases are processed one after another in the
order given; the first failure stops the run.

FIXTURE FILE FORMAT:
  {
    \"tables\": [\"users\", \"posts\"],
    \"fixtures\": {
      \"users\": [{\"id\": 1, \"name\": \"ada\"}],
      \"posts\": [{\"id\": 1, \"user_id\": 1}]
    }
  }

EXAMPLES:
  dbfixtures-seed --database-url postgres://app@localhost/app_test fixtures.json
  dbfixtures-seed --database-url sqlite://a.db --database-url sqlite://b.db fixtures.json
  dbfixtures-seed --tables users,posts --no-reset-sequences fixtures.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Database connection URLs, seeded in the order given
    #[arg(
        long = "database-url",
        env = "DATABASE_URL",
        value_name = "URL",
        help = "Database connection string, repeatable (credentials will be sanitized in logs)"
    )]
    pub database_urls: Vec<String>,

    /// Explicit table order
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated tables to truncate and seed, in order (defaults to the fixture file)"
    )]
    pub tables: Option<Vec<String>>,

    /// Keep identity and auto-increment counters
    #[arg(long, help = "Do not reset sequences / auto-increment counters when truncating")]
    pub no_reset_sequences: bool,

    /// Keep foreign key enforcement while truncating
    #[arg(long, help = "Keep foreign key checks enabled while truncating")]
    pub keep_foreign_keys: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value = "30", help = "Seconds to wait for a database connection")]
    pub connect_timeout: u64,

    /// Pool size per database
    #[arg(long, default_value = "5", help = "Maximum connections per database")]
    pub max_connections: u32,

    /// List compiled-in drivers and exit
    #[arg(long, help = "List supported database types and exit")]
    pub list_drivers: bool,

    /// Fixture file
    #[arg(
        value_name = "FIXTURE_FILE",
        required_unless_present = "list_drivers",
        help = "JSON fixture file to load"
    )]
    pub fixture_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Driver configuration selected by the command-line flags.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig::new()
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
            .with_max_connections(self.max_connections)
            .with_disable_foreign_keys(!self.keep_foreign_keys)
            .with_reset_sequences(!self.no_reset_sequences)
    }
}

/// Outcome of a successful seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Databases seeded
    pub databases: usize,
    /// Tables truncated and seeded in each database
    pub tables: usize,
    /// Rows inserted into each database
    pub rows: usize,
}

/// Loads the fixture file and seeds every database named on the command line.
///
/// Drivers are closed whether or not seeding succeeds. A seeding error takes
/// precedence over a close error.
///
/// # Errors
/// Returns error if:
/// - No database URL or fixture file was given
/// - The fixture file cannot be read or parsed
/// - A driver cannot be created
/// - Any truncate, insert or close operation fails
pub async fn seed(cli: &Cli) -> Result<SeedSummary> {
    let fixture_path = cli.fixture_file.as_ref().ok_or_else(|| {
        DbFixturesError::configuration("A fixture file is required")
    })?;

    if cli.database_urls.is_empty() {
        return Err(DbFixturesError::configuration(
            "At least one --database-url (or DATABASE_URL) is required",
        ));
    }

    let fixtures = FixtureFile::from_path(fixture_path).await?;
    let table_names = cli
        .tables
        .clone()
        .unwrap_or_else(|| fixtures.table_names());
    let rows = table_names
        .iter()
        .filter_map(|table| fixtures.fixtures.get(table))
        .map(Vec::len)
        .sum::<usize>();

    debug!(
        "Loaded {} table(s) from {}",
        table_names.len(),
        fixture_path.display()
    );

    let handler = connect_all(&cli.database_urls, &cli.driver_config()).await?;

    info!(
        "Seeding {} table(s) in {} database(s)",
        table_names.len(),
        handler.driver_count()
    );
    seed_and_close(&handler, &table_names, &fixtures.fixtures).await?;

    Ok(SeedSummary {
        databases: cli.database_urls.len(),
        tables: table_names.len(),
        rows,
    })
}

/// Database types whose drivers are compiled into this binary.
pub fn supported_databases() -> Vec<DatabaseType> {
    DatabaseType::enabled().collect()
}

/// Seeds every driver of `handler`, then closes them all.
///
/// Drivers are closed even when seeding fails. A seeding error takes
/// precedence over a close error, which is only logged.
///
/// # Errors
/// Returns the first truncate, insert or close error
pub async fn seed_and_close(
    handler: &FixtureHandler,
    table_names: &[String],
    fixtures: &HashMap<String, Vec<Row>>,
) -> Result<()> {
    let seeded = handler.insert_fixtures(table_names, fixtures).await;
    let closed = handler.close_drivers().await;

    match (seeded, closed) {
        (Err(e), Err(close_error)) => {
            warn!("Failed to close drivers after seeding error: {}", close_error);
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

/// Creates one driver per URL with [`create_driver`], in order.
async fn connect_all(database_urls: &[String], config: &DriverConfig) -> Result<FixtureHandler> {
    connect_with(database_urls, |database_url| async move {
        create_driver(&database_url, config).await
    })
    .await
}

/// Creates one driver per URL through `connect`, in order.
///
/// If a driver cannot be created, the ones already created are closed before
/// the error is returned.
///
/// # Errors
/// Returns the first error produced by `connect`
pub async fn connect_with<F, Fut>(database_urls: &[String], mut connect: F) -> Result<FixtureHandler>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<BoxedDriver>>,
{
    let mut drivers: Vec<BoxedDriver> = Vec::with_capacity(database_urls.len());

    for database_url in database_urls {
        info!("Connecting to {}", redact_database_url(database_url));
        match connect(database_url.clone()).await {
            Ok(driver) => drivers.push(driver),
            Err(e) => {
                if let Err(close_error) = FixtureHandler::new(drivers).close_drivers().await {
                    warn!("Failed to close drivers: {}", close_error);
                }
                return Err(e);
            }
        }
    }

    Ok(FixtureHandler::new(drivers))
}
