//! Database Test Utilities
//!
//! In-memory SQLite stores for fast tests, and a PostgreSQL testcontainer for
//! the tests that need the real server.

use std::sync::Arc;
use std::time::Duration;

use infra_db::{connect, Database, DatabaseConfig, StoreOptions, SubscriptionStore};
use once_cell::sync::Lazy;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tokio::sync::OnceCell;

/// Table names used by test stores
pub const TEST_PLAN_TABLE: &str = "plan_table";
pub const TEST_SUBSCRIPTION_TABLE: &str = "subscription_table";

/// Default PostgreSQL image for testing
const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "subscriptions_test";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Installs a test-friendly tracing subscriber once per process
///
/// Honours `RUST_LOG`, so `RUST_LOG=infra_db=debug` shows generated SQL.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

/// Store options used by test stores: fixed table names, debug logging on
pub fn test_store_options() -> StoreOptions {
    StoreOptions::new(TEST_PLAN_TABLE, TEST_SUBSCRIPTION_TABLE).debug(true)
}

/// Connects to a fresh, private in-memory SQLite database
///
/// # Panics
///
/// Panics if the pool cannot be created
pub async fn memory_database() -> Arc<dyn Database> {
    init_test_tracing();
    connect(&DatabaseConfig::in_memory_sqlite())
        .await
        .expect("Failed to open in-memory sqlite database")
}

/// Creates an auto-migrated store over a fresh in-memory SQLite database
///
/// # Panics
///
/// Panics if the database or the store cannot be created
pub async fn memory_store() -> SubscriptionStore {
    memory_store_with(test_store_options()).await
}

/// Like [`memory_store`], with custom options
pub async fn memory_store_with(options: StoreOptions) -> SubscriptionStore {
    SubscriptionStore::new(memory_database().await, options)
        .await
        .expect("Failed to create in-memory store")
}

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    /// Creates the database connection URL
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A wrapper around a PostgreSQL test container
///
/// Only the container and its address are kept. Pools are opened per
/// caller, so each `#[tokio::test]` runtime drives its own connections.
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container and creates the test tables
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start, cannot be reached,
    /// or the tables cannot be created
    pub async fn new() -> Result<Self, BoxError> {
        init_test_tracing();

        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let test_db = Self {
            _container: container,
            config: TestDatabaseConfig {
                host,
                port,
                ..TestDatabaseConfig::default()
            },
        };
        test_db.migrate().await?;
        Ok(test_db)
    }

    /// Opens a new pool bound to the calling runtime
    pub async fn connect(&self) -> Result<Arc<dyn Database>, BoxError> {
        Ok(connect(
            &DatabaseConfig::new(self.config.connection_url())
                .max_connections(2)
                .acquire_timeout(Duration::from_secs(30)),
        )
        .await?)
    }

    /// Creates a store over a fresh pool; the tables already exist
    pub async fn store(&self) -> Result<SubscriptionStore, BoxError> {
        let options = test_store_options().automigrate(false);
        Ok(SubscriptionStore::new(self.connect().await?, options).await?)
    }

    async fn migrate(&self) -> Result<(), BoxError> {
        let store = SubscriptionStore::new(self.connect().await?, test_store_options()).await?;
        store.close().await;
        Ok(())
    }
}

/// Global test container shared by the PostgreSQL integration tests
static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Gets or starts the shared PostgreSQL test container
///
/// The tables are created once, by whichever test gets here first.
/// Callers open their own pool with [`TestDatabase::store`].
///
/// # Panics
///
/// Panics if the container fails to start
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to create shared test database"),
            )
        })
        .await
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let config = TestDatabaseConfig::default();
        let url = config.connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.contains(POSTGRES_DB));
    }

    #[tokio::test]
    async fn test_memory_store_uses_test_tables() {
        let store = memory_store().await;
        assert_eq!(store.plan_table_name(), TEST_PLAN_TABLE);
        assert_eq!(store.subscription_table_name(), TEST_SUBSCRIPTION_TABLE);
    }
}
