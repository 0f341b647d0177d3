//! Database connection pool management
//!
//! This module provides connection pool configuration and creation for SQLite
//! and PostgreSQL. The backend is chosen from the connection URL scheme.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::executor::Database;
use crate::postgres::PostgresDatabase;
use crate::sqlite::SqliteDatabase;

/// Configuration options for the database connection pool
///
/// # Example
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/subscriptions")
///     .max_connections(20)
///     .min_connections(5)
///     .acquire_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.max_connections, 20);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string; the scheme selects the backend
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
    /// Maximum lifetime of a connection, `None` to keep connections forever
    pub max_lifetime: Option<Duration>,
    /// Idle timeout before closing a connection, `None` to never close idle ones
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Creates a new database configuration with the given connection URL
    ///
    /// # Arguments
    ///
    /// * `url` - Connection string (e.g., "sqlite://subscriptions.db?mode=rwc")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
        }
    }

    /// Configuration for a private in-memory SQLite database
    ///
    /// An in-memory database lives only as long as its connection, so the
    /// pool holds exactly one connection that never expires.
    pub fn in_memory_sqlite() -> Self {
        Self::new("sqlite::memory:")
            .max_connections(1)
            .min_connections(1)
            .max_lifetime(None)
            .idle_timeout(None)
    }

    /// Sets the maximum number of connections in the pool
    ///
    /// # Arguments
    ///
    /// * `max` - Maximum connection count (default: 5)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections to maintain
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets how long to wait for a connection (default: 30s)
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// The dialect implied by the URL scheme
    pub fn dialect(&self) -> Result<Dialect, DatabaseError> {
        Dialect::from_url(&self.url)
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("sqlite://subscriptions.db?mode=rwc")
    }
}

/// Creates a SQLite connection pool with the given configuration
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if the pool cannot be created
pub async fn create_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let config = if config.is_in_memory() {
        DatabaseConfig {
            url: config.url.clone(),
            ..DatabaseConfig::in_memory_sqlite()
        }
    } else {
        config.clone()
    };

    info!(
        "Creating sqlite pool with max_connections={}, min_connections={}",
        config.max_connections, config.min_connections
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Sqlite pool created successfully");
    Ok(pool)
}

/// Creates a PostgreSQL connection pool with the given configuration
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if the pool cannot be created
pub async fn create_postgres_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    info!(
        "Creating postgres pool with max_connections={}, min_connections={}",
        config.max_connections, config.min_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Postgres pool created successfully");
    Ok(pool)
}

/// Connects to the database named by `config.url`
///
/// # Errors
///
/// - `DatabaseError::Configuration` if the URL scheme is not supported
/// - `DatabaseError::ConnectionFailed` if the pool cannot be created
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::{connect, DatabaseConfig};
///
/// let db = connect(&DatabaseConfig::new("sqlite::memory:")).await?;
/// assert_eq!(db.dialect().name(), "sqlite");
/// ```
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Database>, DatabaseError> {
    let db: Arc<dyn Database> = match config.dialect()? {
        Dialect::Sqlite => Arc::new(SqliteDatabase::new(create_sqlite_pool(config).await?)),
        Dialect::Postgres => Arc::new(PostgresDatabase::new(create_postgres_pool(config).await?)),
    };
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("postgres://test")
            .max_connections(50)
            .min_connections(10)
            .acquire_timeout(Duration::from_secs(60));

        assert_eq!(config.max_connections, 50);
        assert_eq!(config.min_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
        assert_eq!(config.dialect().unwrap(), Dialect::Postgres);
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(DatabaseConfig::in_memory_sqlite().is_in_memory());
        assert!(DatabaseConfig::new("sqlite://file:test?mode=memory&cache=shared").is_in_memory());
        assert!(!DatabaseConfig::default().is_in_memory());
    }

    #[tokio::test]
    async fn test_connect_in_memory_sqlite() {
        let db = connect(&DatabaseConfig::in_memory_sqlite()).await.unwrap();
        assert_eq!(db.dialect(), Dialect::Sqlite);
    }
}
