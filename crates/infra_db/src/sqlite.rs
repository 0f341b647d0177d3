//! SQLite backend
//!
//! Datetimes and decimals are bound as their portable text forms, so stored
//! timestamps compare correctly as strings against bound instants.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tokio::sync::Mutex;
use tracing::warn;

use subscription_kernel::{format_datetime, Value};

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::executor::{Database, Executor, Row, Transaction};
use crate::sql::Statement;

/// A SQLite database behind an sqlx pool
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Executor for SqliteDatabase {
    async fn execute(&self, statement: &Statement) -> Result<u64, DatabaseError> {
        let result = build_query(statement).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, DatabaseError> {
        let rows = build_query(statement).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>, DatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteTransaction { tx: Mutex::new(tx) }))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A transaction on a single pooled SQLite connection
pub struct SqliteTransaction {
    tx: Mutex<sqlx::Transaction<'static, Sqlite>>,
}

#[async_trait]
impl Executor for SqliteTransaction {
    async fn execute(&self, statement: &Statement) -> Result<u64, DatabaseError> {
        let mut tx = self.tx.lock().await;
        let result = build_query(statement).execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Row>, DatabaseError> {
        let mut tx = self.tx.lock().await;
        let rows = build_query(statement).fetch_all(&mut **tx).await?;
        rows.iter().map(decode_row).collect()
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let this = *self;
        this.tx.into_inner().commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        let this = *self;
        this.tx.into_inner().rollback().await?;
        warn!(dialect = "sqlite", "Transaction rolled back");
        Ok(())
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

fn build_query(statement: &Statement) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    let mut query = sqlx::query(statement.sql());
    for param in statement.params() {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Text(text) => query.bind(text.as_str()),
            Value::Integer(number) => query.bind(*number),
            Value::Decimal(decimal) => query.bind(decimal.to_string()),
            Value::DateTime(instant) => query.bind(format_datetime(*instant)),
        };
    }
    query
}

/// Converts a row to portable strings using each value's storage class
fn decode_row(row: &SqliteRow) -> Result<Row, DatabaseError> {
    let mut decoded = Row::new();
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            continue;
        }
        let type_name = raw.type_info().name().to_ascii_uppercase();
        let text = match type_name.as_str() {
            "INTEGER" | "BIGINT" | "INT8" | "BOOLEAN" => row.try_get::<i64, _>(index)?.to_string(),
            "REAL" | "FLOAT" | "DOUBLE" => row.try_get::<f64, _>(index)?.to_string(),
            "BLOB" => String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(index)?).into_owned(),
            _ => row.try_get_unchecked::<String, _>(index)?,
        };
        decoded.insert(column.name().to_string(), text);
    }
    Ok(decoded)
}
