//! SQL dialects
//!
//! The store speaks to SQLite and PostgreSQL. Dialects differ in placeholder
//! syntax and in a few column type names; identifier quoting is the standard
//! double quote for both.

use std::fmt;
use std::str::FromStr;

use crate::error::DatabaseError;

/// A supported SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Infers the dialect from a connection URL scheme
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` for unsupported schemes
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::Dialect;
    ///
    /// assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::Sqlite);
    /// assert_eq!(Dialect::from_url("postgres://localhost/app").unwrap(), Dialect::Postgres);
    /// ```
    pub fn from_url(url: &str) -> Result<Self, DatabaseError> {
        let scheme = url.split(':').next().unwrap_or_default();
        scheme.parse().map_err(|_| {
            DatabaseError::Configuration(format!("unsupported database url scheme '{}'", scheme))
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
        }
    }

    /// Placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Sqlite => "?".to_string(),
            Dialect::Postgres => format!("${}", index),
        }
    }

    /// Quotes an identifier, doubling embedded quotes
    pub fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    pub(crate) fn datetime_type(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "DATETIME",
            Dialect::Postgres => "TIMESTAMP",
        }
    }

    pub(crate) fn decimal_type(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "DECIMAL",
            Dialect::Postgres => "NUMERIC",
        }
    }

    /// Whether OFFSET needs a preceding LIMIT
    pub(crate) fn requires_limit_for_offset(&self) -> bool {
        matches!(self, Dialect::Sqlite)
    }
}

impl FromStr for Dialect {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            other => Err(DatabaseError::Configuration(format!(
                "unsupported dialect '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
