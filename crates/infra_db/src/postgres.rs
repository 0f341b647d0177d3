//! PostgreSQL backend
//!
//! Datetimes are bound as `TIMESTAMP` (naive UTC) and decimals as `NUMERIC`,
//! matching the column types the schema module creates.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgPool, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use subscription_kernel::{format_datetime, Value};

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::executor::{Database, Executor, Row, Transaction};
use crate::sql::Statement;

/// A PostgreSQL database behind an sqlx pool
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Executor for PostgresDatabase {
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
impl Database for PostgresDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>, DatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx: Mutex::new(tx) }))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A transaction on a single pooled PostgreSQL connection
pub struct PostgresTransaction {
    tx: Mutex<sqlx::Transaction<'static, Postgres>>,
}

#[async_trait]
impl Executor for PostgresTransaction {
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
impl Transaction for PostgresTransaction {
    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let this = *self;
        this.tx.into_inner().commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        let this = *self;
        this.tx.into_inner().rollback().await?;
        warn!(dialect = "postgres", "Transaction rolled back");
        Ok(())
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

fn build_query(statement: &Statement) -> Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(statement.sql());
    for param in statement.params() {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Text(text) => query.bind(text.as_str()),
            Value::Integer(number) => query.bind(*number),
            Value::Decimal(decimal) => query.bind(*decimal),
            Value::DateTime(instant) => query.bind(instant.naive_utc()),
        };
    }
    query
}

/// Converts a row to portable strings using each column's declared type
fn decode_row(row: &PgRow) -> Result<Row, DatabaseError> {
    let mut decoded = Row::new();
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            continue;
        }
        let type_name = raw.type_info().name().to_string();
        let text = match type_name.as_str() {
            "NUMERIC" => row.try_get::<Decimal, _>(index)?.to_string(),
            "TIMESTAMP" => format_datetime(row.try_get::<NaiveDateTime, _>(index)?.and_utc()),
            "TIMESTAMPTZ" => format_datetime(row.try_get::<DateTime<Utc>, _>(index)?),
            "DATE" => row.try_get::<NaiveDate, _>(index)?.to_string(),
            "INT8" => row.try_get::<i64, _>(index)?.to_string(),
            "INT4" => row.try_get::<i32, _>(index)?.to_string(),
            "INT2" => row.try_get::<i16, _>(index)?.to_string(),
            "FLOAT8" => row.try_get::<f64, _>(index)?.to_string(),
            "FLOAT4" => row.try_get::<f32, _>(index)?.to_string(),
            "BOOL" => row.try_get::<bool, _>(index)?.to_string(),
            "UUID" => row.try_get::<Uuid, _>(index)?.to_string(),
            _ => row.try_get_unchecked::<String, _>(index)?,
        };
        decoded.insert(column.name().to_string(), text);
    }
    Ok(decoded)
}
