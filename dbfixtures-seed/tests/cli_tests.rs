//! Command-line parsing tests for dbfixtures-seed.

use clap::Parser;
use dbfixtures_core::DatabaseType;
use dbfixtures_seed::{Cli, supported_databases};
use std::path::PathBuf;
use std::time::Duration;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dbfixtures-seed").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn test_repeatable_database_urls_keep_order() {
    let cli = parse(&[
        "--database-url",
        "sqlite://b.db",
        "--database-url",
        "postgres://app@localhost/app_test",
        "fixtures.json",
    ]);

    assert_eq!(
        cli.database_urls,
        vec!["sqlite://b.db", "postgres://app@localhost/app_test"]
    );
    assert_eq!(cli.fixture_file, Some(PathBuf::from("fixtures.json")));
    assert_eq!(cli.tables, None);
}

#[test]
fn test_tables_are_comma_separated() {
    let cli = parse(&[
        "--database-url",
        "sqlite://a.db",
        "--tables",
        "users,posts,comments",
        "fixtures.json",
    ]);

    assert_eq!(
        cli.tables,
        Some(vec![
            "users".to_string(),
            "posts".to_string(),
            "comments".to_string()
        ])
    );
}

#[test]
fn test_default_driver_config() {
    let cli = parse(&["--database-url", "sqlite://a.db", "fixtures.json"]);
    let config = cli.driver_config();

    assert_eq!(config.connect_timeout, Duration::from_secs(30));
    assert_eq!(config.max_connections, 5);
    assert!(config.disable_foreign_keys);
    assert!(config.reset_sequences);
}

#[test]
fn test_truncate_flags_map_to_driver_config() {
    let cli = parse(&[
        "--database-url",
        "sqlite://a.db",
        "--no-reset-sequences",
        "--keep-foreign-keys",
        "--connect-timeout",
        "3",
        "--max-connections",
        "1",
        "fixtures.json",
    ]);
    let config = cli.driver_config();

    assert_eq!(config.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.max_connections, 1);
    assert!(!config.disable_foreign_keys);
    assert!(!config.reset_sequences);
}

#[test]
fn test_verbosity_flags() {
    let cli = parse(&["-vv", "--database-url", "sqlite://a.db", "fixtures.json"]);
    assert_eq!(cli.global.verbose, 2);
    assert!(!cli.global.quiet);

    let cli = parse(&["-q", "--database-url", "sqlite://a.db", "fixtures.json"]);
    assert!(cli.global.quiet);
}

#[test]
fn test_fixture_file_is_required() {
    let result = Cli::try_parse_from(["dbfixtures-seed", "--database-url", "sqlite://a.db"]);
    assert!(result.is_err());
}

#[test]
fn test_list_drivers_needs_no_fixture_file() {
    let cli = parse(&["--list-drivers"]);
    assert!(cli.list_drivers);
    assert_eq!(cli.fixture_file, None);
}

#[test]
fn test_supported_databases_follow_features() {
    let supported = supported_databases();

    assert!(supported.iter().all(|database_type| database_type.is_enabled()));
    assert_eq!(
        supported.contains(&DatabaseType::SQLite),
        cfg!(feature = "sqlite")
    );
    assert_eq!(
        supported.contains(&DatabaseType::PostgreSQL),
        cfg!(feature = "postgresql")
    );
}
