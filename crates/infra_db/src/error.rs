//! Database error types
//!
//! This module defines the error types that can occur during database operations,
//! providing meaningful error messages and proper error chaining.

use subscription_kernel::CoreError;
use thiserror::Error;

/// Errors that can occur during database operations
///
/// Execution errors from the driver are carried verbatim in `SqlError`;
/// every other variant is raised by this crate before or after I/O.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// A caller-supplied argument was rejected before any I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// A statement could not be compiled
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A statement ran but returned something unusable
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Creating a table failed; `source` is the error that stopped it
    #[error("Migration failed for table '{table}': {source}")]
    MigrationFailed {
        table: String,
        #[source]
        source: Box<DatabaseError>,
    },

    /// Store or pool configuration is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A record could not be built from, or converted to, column values
    #[error("Record error: {0}")]
    Record(#[from] CoreError),

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity (e.g., "plan", "subscription")
    /// * `id` - The identifier that was not found
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("plan", "20240601083000000000000123");
    /// assert!(error.to_string().contains("plan"));
    /// assert!(error.is_not_found());
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DatabaseError::Validation(message.into())
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        DatabaseError::InvalidQuery(message.into())
    }

    pub fn migration_failed(table: impl Into<String>, source: DatabaseError) -> Self {
        DatabaseError::MigrationFailed {
            table: table.into(),
            source: Box::new(source),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatabaseError::NotFound(_) | DatabaseError::SqlError(sqlx::Error::RowNotFound)
        )
    }

    /// Checks if this error is a constraint violation reported by the database
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            DatabaseError::SqlError(sqlx::Error::Database(db_err)) => matches!(
                db_err.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ),
            _ => false,
        }
    }

    /// Checks if this error is a connection-related issue
    ///
    /// A failed migration is classified by the error that stopped it.
    pub fn is_connection_error(&self) -> bool {
        match self {
            DatabaseError::MigrationFailed { source, .. } => source.is_connection_error(),
            _ => matches!(
                self,
                DatabaseError::ConnectionFailed(_)
                    | DatabaseError::SqlError(
                        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                    )
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(DatabaseError::not_found("plan", "x").is_not_found());
        assert!(DatabaseError::SqlError(sqlx::Error::RowNotFound).is_not_found());
        assert!(DatabaseError::SqlError(sqlx::Error::PoolTimedOut).is_connection_error());
        assert!(!DatabaseError::validation("empty id").is_constraint_violation());
    }

    #[test]
    fn test_migration_failure_keeps_its_source() {
        use std::error::Error as _;

        let error = DatabaseError::migration_failed(
            "plans",
            DatabaseError::SqlError(sqlx::Error::PoolClosed),
        );
        assert!(error.is_connection_error());
        assert!(error.to_string().contains("plans"));
        let cause = DatabaseError::SqlError(sqlx::Error::PoolClosed).to_string();
        assert_eq!(error.source().map(|e| e.to_string()), Some(cause));

        let error = DatabaseError::migration_failed("plans", DatabaseError::invalid_query("x"));
        assert!(!error.is_connection_error());
    }

    #[test]
    fn test_record_errors_convert() {
        let error: DatabaseError = CoreError::validation("bad").into();
        assert!(matches!(error, DatabaseError::Record(_)));
    }
}
