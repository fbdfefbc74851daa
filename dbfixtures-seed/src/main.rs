//! Database fixture seeding tool.
//!
//! This binary truncates the fixture tables in one or more databases and
//! inserts the rows from a JSON fixture file.
//!
//! # Security Guarantees
//! - No credentials stored or logged
//! - Connection strings are sanitized in every message

use clap::Parser;
use dbfixtures_core::{Result, init_logging};
use dbfixtures_seed::{Cli, seed, supported_databases};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet)?;

    if cli.list_drivers {
        list_supported_databases();
        return Ok(());
    }

    let summary = seed(&cli).await.map_err(|e| {
        error!("Seeding failed: {}", e);
        e
    })?;

    info!("✓ Fixtures loaded");
    if !cli.global.quiet {
        println!("Fixtures loaded successfully");
        println!("Databases: {}", summary.databases);
        println!("Tables: {}", summary.tables);
        println!("Rows per database: {}", summary.rows);
    }

    Ok(())
}

/// Lists compiled-in database types and their connection string formats
fn list_supported_databases() {
    println!("Supported Database Types:");
    println!();

    for database_type in supported_databases() {
        println!("{}:", database_type);
        println!("  Connection: {}", database_type.connection_format());
        println!();
    }

    println!("Truncate Behaviour:");
    println!("  • Sequences reset unless --no-reset-sequences");
    println!("  • Foreign key checks suspended unless --keep-foreign-keys");
}
