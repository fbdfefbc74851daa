//! Logging setup shared by the dbfixtures binaries.
//!
//! Output goes to stderr so stdout stays free for command output. The level
//! comes from the `-v`/`-q` flags unless `RUST_LOG` holds valid filter
//! directives; `--quiet` always wins.

use crate::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps CLI verbosity flags to a tracing level.
///
/// `quiet` wins over any verbosity: only errors are shown.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Builds the event filter for the given flags and `RUST_LOG` directives.
///
/// Invalid directives are ignored in favour of the flag level.
pub fn filter_for(verbose: u8, quiet: bool, directives: Option<&str>) -> EnvFilter {
    let from_flags =
        || EnvFilter::default().add_directive(LevelFilter::from_level(level_for(verbose, quiet)).into());

    match directives {
        Some(directives) if !quiet && !directives.trim().is_empty() => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| from_flags())
        }
        _ => from_flags(),
    }
}

/// Initializes logging on stderr.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs, even with `RUST_LOG` set
///
/// # Example
/// ```rust,no_run
/// use dbfixtures_core::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let directives = std::env::var("RUST_LOG").ok();

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose, quiet, directives.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| {
            crate::error::DbFixturesError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })
}
