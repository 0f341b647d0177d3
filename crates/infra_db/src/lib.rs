//! Infrastructure Database Layer
//!
//! This crate persists plans and subscriptions over SQLite or PostgreSQL
//! using SQLx.
//!
//! # Architecture
//!
//! - `query` turns sparse filter criteria into parameterized SELECTs
//! - `sql` holds the statement builders shared by queries and mutations
//! - `executor` abstracts statement execution; `sqlite` and `postgres`
//!   implement it over sqlx pools
//! - `repositories` maps records to rows and back
//! - `store` ties both repositories to one database and migrates the schema
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{connect, DatabaseConfig, StoreOptions, SubscriptionStore};
//! use infra_db::query::PlanQuery;
//!
//! let db = connect(&DatabaseConfig::new("sqlite::memory:")).await?;
//! let store = SubscriptionStore::new(db, StoreOptions::default()).await?;
//! let active = store.plans().list(&PlanQuery::new().with_status("active")).await?;
//! ```

pub mod dialect;
pub mod error;
pub mod executor;
pub mod pool;
pub mod postgres;
pub mod query;
pub mod repositories;
pub mod schema;
pub mod sql;
pub mod sqlite;
pub mod store;

pub use dialect::Dialect;
pub use error::DatabaseError;
pub use executor::{Database, Executor, Row, Transaction};
pub use pool::{connect, create_postgres_pool, create_sqlite_pool, DatabaseConfig};
pub use postgres::PostgresDatabase;
pub use query::{PlanQuery, RecordQuery, SubscriptionQuery};
pub use repositories::{PlanRepository, Queryable, Repository, SubscriptionRepository};
pub use schema::{ColumnType, TableSchema};
pub use sql::{Direction, Statement};
pub use sqlite::SqliteDatabase;
pub use store::{StoreOptions, SubscriptionStore};
