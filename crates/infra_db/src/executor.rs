//! Database executor abstraction
//!
//! Repositories only ever hand a `Statement` to an `Executor` and get back an
//! affected-row count or string-keyed rows. `Database` adds transactions and
//! knows its dialect; the SQLite and PostgreSQL backends implement both.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::sql::Statement;

/// A result row keyed by column name; NULL columns are absent
pub type Row = BTreeMap<String, String>;

/// Runs compiled statements
#[async_trait]
pub trait Executor: Send + Sync {
    /// Executes a statement and returns the number of affected rows
    async fn execute(&self, statement: &Statement) -> Result<u64, DatabaseError>;

    /// Executes a query and returns every row in result-set order
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, DatabaseError>;
}

/// A database handle backed by a connection pool
#[async_trait]
pub trait Database: Executor + fmt::Debug {
    fn dialect(&self) -> Dialect;

    /// Starts a transaction on a dedicated connection
    async fn begin(&self) -> Result<Box<dyn Transaction>, DatabaseError>;

    fn as_executor(&self) -> &dyn Executor;

    /// Closes the pool; pending acquisitions fail afterwards
    async fn close(&self);
}

/// An open transaction
///
/// Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait Transaction: Executor {
    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError>;

    fn as_executor(&self) -> &dyn Executor;
}
