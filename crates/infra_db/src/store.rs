//! The subscription store facade
//!
//! `SubscriptionStore` owns the database handle and the two repositories,
//! and creates the tables on construction when auto-migration is enabled.

use std::sync::Arc;
use tracing::info;

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::executor::{Database, Transaction};
use crate::repositories::{PlanRepository, SubscriptionRepository};
use crate::schema::TableSchema;

/// Construction options for a `SubscriptionStore`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub plan_table_name: String,
    pub subscription_table_name: String,
    /// Expected dialect; inferred from the database handle when `None`
    pub dialect: Option<Dialect>,
    pub automigrate: bool,
    pub debug: bool,
}

impl StoreOptions {
    pub fn new(
        plan_table_name: impl Into<String>,
        subscription_table_name: impl Into<String>,
    ) -> Self {
        Self {
            plan_table_name: plan_table_name.into(),
            subscription_table_name: subscription_table_name.into(),
            ..Self::default()
        }
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn automigrate(mut self, automigrate: bool) -> Self {
        self.automigrate = automigrate;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn validate(&self) -> Result<(), DatabaseError> {
        if self.plan_table_name.trim().is_empty() {
            return Err(DatabaseError::Configuration(
                "plan table name is required".to_string(),
            ));
        }
        if self.subscription_table_name.trim().is_empty() {
            return Err(DatabaseError::Configuration(
                "subscription table name is required".to_string(),
            ));
        }
        if self.plan_table_name == self.subscription_table_name {
            return Err(DatabaseError::Configuration(format!(
                "plan and subscription tables must differ, both are '{}'",
                self.plan_table_name
            )));
        }
        Ok(())
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            plan_table_name: "plans".to_string(),
            subscription_table_name: "subscriptions".to_string(),
            dialect: None,
            automigrate: true,
            debug: false,
        }
    }
}

/// Persistence for plans and subscriptions over one database
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::{connect, DatabaseConfig, StoreOptions, SubscriptionStore};
///
/// let db = connect(&DatabaseConfig::new("sqlite://subscriptions.db?mode=rwc")).await?;
/// let store = SubscriptionStore::new(db, StoreOptions::default()).await?;
/// let total = store.plans().count(&Default::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    db: Arc<dyn Database>,
    dialect: Dialect,
    plans: PlanRepository,
    subscriptions: SubscriptionRepository,
}

impl SubscriptionStore {
    /// Builds a store and, when enabled, creates its tables
    ///
    /// # Errors
    ///
    /// - `DatabaseError::Configuration` for empty or identical table names, or
    ///   an explicit dialect that differs from the database handle's
    /// - `DatabaseError::MigrationFailed` if auto-migration fails
    pub async fn new(db: Arc<dyn Database>, options: StoreOptions) -> Result<Self, DatabaseError> {
        options.validate()?;

        let dialect = match options.dialect {
            Some(dialect) if dialect != db.dialect() => {
                return Err(DatabaseError::Configuration(format!(
                    "dialect '{}' does not match the '{}' database",
                    dialect,
                    db.dialect()
                )));
            }
            Some(dialect) => dialect,
            None => db.dialect(),
        };

        let plans = PlanRepository::new(Arc::clone(&db), &options.plan_table_name)?
            .with_debug(options.debug);
        let subscriptions =
            SubscriptionRepository::new(Arc::clone(&db), &options.subscription_table_name)?
                .with_debug(options.debug);

        let store = Self {
            db,
            dialect,
            plans,
            subscriptions,
        };

        if options.automigrate {
            store.auto_migrate().await?;
        }

        Ok(store)
    }

    /// Creates both tables if they do not exist yet
    ///
    /// Stops at the first failure; tables created before it are kept.
    pub async fn auto_migrate(&self) -> Result<(), DatabaseError> {
        let schemas = [
            TableSchema::plan(self.plan_table_name()),
            TableSchema::subscription(self.subscription_table_name()),
        ];

        for schema in &schemas {
            let statement = schema
                .create_table_statement(self.dialect)
                .map_err(|e| DatabaseError::migration_failed(&schema.name, e))?;
            if statement.sql().trim().is_empty() {
                return Err(DatabaseError::migration_failed(
                    &schema.name,
                    DatabaseError::invalid_query("empty DDL"),
                ));
            }
            self.db
                .as_executor()
                .execute(&statement)
                .await
                .map_err(|e| DatabaseError::migration_failed(&schema.name, e))?;
            info!(table = %schema.name, dialect = %self.dialect, "Table migrated");
        }

        Ok(())
    }

    pub fn plans(&self) -> &PlanRepository {
        &self.plans
    }

    pub fn subscriptions(&self) -> &SubscriptionRepository {
        &self.subscriptions
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn plan_table_name(&self) -> &str {
        self.plans.table_name()
    }

    pub fn subscription_table_name(&self) -> &str {
        self.subscriptions.table_name()
    }

    pub fn database(&self) -> &Arc<dyn Database> {
        &self.db
    }

    /// Starts a transaction for the repositories' `*_in` operations
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let tx = store.begin().await?;
    /// store.plans().create_in(tx.as_executor(), &mut plan).await?;
    /// store.subscriptions().create_in(tx.as_executor(), &mut subscription).await?;
    /// tx.commit().await?;
    /// ```
    pub async fn begin(&self) -> Result<Box<dyn Transaction>, DatabaseError> {
        self.db.begin().await
    }

    /// Closes the underlying pool
    pub async fn close(&self) {
        self.db.close().await;
    }
}
