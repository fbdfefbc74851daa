//! Helper utilities shared by the SQL drivers.
//!
//! Fixture rows arrive as JSON objects; these helpers turn them into quoted
//! column lists, placeholder lists and bound parameters.

use crate::{Result, error::DbFixturesError, models::Row};
use serde_json::{Map, Value};

/// Identifier quoting style of a SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SqlDialect {
    /// Double quotes (PostgreSQL, SQLite)
    Ansi,
    /// Backticks (MySQL)
    MySql,
}

impl SqlDialect {
    const fn quote_char(self) -> char {
        match self {
            Self::Ansi => '"',
            Self::MySql => '`',
        }
    }

    /// Quotes a single identifier, doubling embedded quote characters.
    pub(crate) fn quote_column(self, name: &str) -> String {
        let quote = self.quote_char();
        let escaped_quote = format!("{quote}{quote}");

        format!("{quote}{}{quote}", name.replace(quote, &escaped_quote))
    }

    /// Quotes a possibly schema-qualified table name.
    ///
    /// `public.users` becomes `"public"."users"`.
    pub(crate) fn quote_identifier(self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_column(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Builds a positional `INSERT` for the given columns.
    ///
    /// An empty column list inserts a row of defaults.
    pub(crate) fn insert_statement<'a>(
        self,
        table_name: &str,
        columns: impl ExactSizeIterator<Item = &'a String>,
    ) -> String {
        let table = self.quote_identifier(table_name);
        let count = columns.len();

        if count == 0 {
            return match self {
                Self::Ansi => format!("INSERT INTO {table} DEFAULT VALUES"),
                Self::MySql => format!("INSERT INTO {table} () VALUES ()"),
            };
        }

        let column_list = columns
            .map(|column| self.quote_column(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; count].join(", ");

        format!("INSERT INTO {table} ({column_list}) VALUES ({placeholders})")
    }
}

/// Returns the column map of a fixture row.
///
/// # Errors
/// Returns `InvalidRow` if the row is not a JSON object
pub(crate) fn row_object<'a>(
    table_name: &str,
    index: usize,
    row: &'a Row,
) -> Result<&'a Map<String, Value>> {
    row.as_object().ok_or_else(|| {
        DbFixturesError::invalid_row(
            table_name,
            index,
            format!("expected a JSON object, found {}", json_kind(row)),
        )
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Binds a JSON value to a sqlx query as the closest native type.
///
/// Integers bind as `i64`, other numbers as `f64`, strings as text, `null`
/// as a typed NULL, and arrays/objects as their JSON text. Integers above
/// `i64::MAX` bind as their decimal text unless the `unsigned` form is used,
/// which binds them as `u64` for databases that have unsigned columns.
macro_rules! bind_json_value {
    (@bind $query:expr, $value:expr, |$big:ident| $unsigned:expr) => {
        match $value {
            serde_json::Value::Null => $query.bind(None::<String>),
            serde_json::Value::Bool(flag) => $query.bind(*flag),
            serde_json::Value::Number(number) => match (number.as_i64(), number.as_u64()) {
                (Some(int), _) => $query.bind(int),
                (None, Some($big)) => $query.bind($unsigned),
                (None, None) => $query.bind(number.as_f64()),
            },
            serde_json::Value::String(text) => $query.bind(text.as_str()),
            nested => $query.bind(nested.to_string()),
        }
    };
    ($query:expr, $value:expr, unsigned) => {
        bind_json_value!(@bind $query, $value, |big| big)
    };
    ($query:expr, $value:expr) => {
        bind_json_value!(@bind $query, $value, |big| big.to_string())
    };
}

#[cfg(any(feature = "mysql", feature = "sqlite"))]
pub(crate) use bind_json_value;
