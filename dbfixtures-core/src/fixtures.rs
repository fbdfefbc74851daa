//! Fixture files.
//!
//! A fixture file is a JSON document with the rows to seed, keyed by table,
//! and an optional explicit table order:
//!
//! ```json
//! {
//!   "tables": ["users", "posts"],
//!   "fixtures": {
//!     "users": [{"id": 1, "name": "ada"}],
//!     "posts": [{"id": 1, "user_id": 1, "body": "hello"}]
//!   }
//! }
//! ```
//!
//! Without `tables`, every key of `fixtures` is seeded in lexicographic
//! order. Listing tables explicitly also allows truncating tables that have
//! no rows.

use crate::error::DbFixturesError;
use crate::{Result, models::Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Parsed contents of a fixture file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureFile {
    /// Tables to truncate and seed, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
    /// Rows per table
    #[serde(default)]
    pub fixtures: HashMap<String, Vec<Row>>,
}

impl FixtureFile {
    /// Parses a fixture file from a JSON string.
    ///
    /// # Errors
    /// Returns a serialization error if the JSON is malformed or has the
    /// wrong shape
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DbFixturesError::Serialization {
            context: "Failed to parse fixture file".to_string(),
            source: e,
        })
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DbFixturesError::Io {
                context: format!("Failed to read fixture file {}", path.display()),
                source: e,
            })?;

        Self::from_json(&contents).map_err(|e| match e {
            DbFixturesError::Serialization { source, .. } => DbFixturesError::Serialization {
                context: format!("Failed to parse fixture file {}", path.display()),
                source,
            },
            other => other,
        })
    }

    /// Tables to process, in order.
    pub fn table_names(&self) -> Vec<String> {
        match &self.tables {
            Some(tables) => tables.clone(),
            None => {
                let mut names: Vec<String> = self.fixtures.keys().cloned().collect();
                names.sort();
                names
            }
        }
    }
}
