//! Generic record repository
//!
//! One implementation serves every entity: the entity supplies its columns
//! and lifecycle hooks through `Record`, and its filter through `Queryable`.

use std::marker::PhantomData;
use std::sync::Arc;

use subscription_kernel::columns::COLUMN_ID;
use subscription_kernel::{now_utc, Record};
use tracing::{debug, error, warn};

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::executor::{Database, Executor, Row, Transaction};
use crate::query::RecordQuery;
use crate::sql::{delete_by_id, insert, update_by_id, Statement};

/// An entity that can be filtered with a `RecordQuery`
pub trait Queryable: Record + 'static {
    type Query: RecordQuery<Record = Self>;
}

/// Repository for one entity stored in one table
///
/// Holds only immutable configuration and a shared database handle, so a
/// repository may be cloned and used from several tasks at once.
///
/// # Example
///
/// ```rust,ignore
/// use domain_subscription::Plan;
/// use infra_db::repositories::PlanRepository;
///
/// let repo = PlanRepository::new(db, "plans")?;
/// let mut plan = Plan::new();
/// plan.set_title("Pro");
/// repo.create(&mut plan).await?;
///
/// // Operations ending in `_in` run on a caller's transaction
/// let tx = db.begin().await?;
/// repo.update_in(tx.as_executor(), &mut plan).await?;
/// tx.commit().await?;
/// ```
pub struct Repository<R: Queryable> {
    db: Arc<dyn Database>,
    table: String,
    debug: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R: Queryable> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            table: self.table.clone(),
            debug: self.debug,
            _record: PhantomData,
        }
    }
}

impl<R: Queryable> std::fmt::Debug for Repository<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &R::ENTITY)
            .field("table", &self.table)
            .field("dialect", &self.db.dialect())
            .field("debug", &self.debug)
            .finish()
    }
}

impl<R: Queryable> Repository<R> {
    /// Creates a repository over `table`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` if the table name is empty
    pub fn new(db: Arc<dyn Database>, table: impl Into<String>) -> Result<Self, DatabaseError> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(DatabaseError::Configuration(format!(
                "{} table name is required",
                R::ENTITY
            )));
        }
        Ok(Self {
            db,
            table,
            debug: false,
            _record: PhantomData,
        })
    }

    /// Logs every generated statement at debug level when enabled
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.db.dialect()
    }

    /// Inserts a new record
    ///
    /// Stamps the creation and update timestamps (and any entity-specific
    /// defaults), inserts every column, then marks the record clean.
    pub async fn create(&self, record: &mut R) -> Result<(), DatabaseError> {
        self.create_in(self.db.as_executor(), record).await
    }

    /// Like [`create`](Self::create), on a caller-supplied executor
    ///
    /// Pass `Transaction::as_executor` to make the insert part of a
    /// transaction the caller commits or rolls back.
    pub async fn create_in(
        &self,
        executor: &dyn Executor,
        record: &mut R,
    ) -> Result<(), DatabaseError> {
        ensure_id::<R>(record.id())?;
        record.touch_created(now_utc());

        let statement = insert(&self.table, &record.fields(), self.dialect())?;
        self.execute_on(executor, "create", &statement).await?;

        record.mark_clean();
        Ok(())
    }

    /// Writes the changed columns of `record`
    ///
    /// A record with nothing changed besides its id is left untouched and no
    /// statement is executed. Otherwise `updated_at` is stamped and the
    /// record is marked clean once the UPDATE succeeds.
    pub async fn update(&self, record: &mut R) -> Result<(), DatabaseError> {
        self.update_in(self.db.as_executor(), record).await
    }

    pub async fn update_in(
        &self,
        executor: &dyn Executor,
        record: &mut R,
    ) -> Result<(), DatabaseError> {
        ensure_id::<R>(record.id())?;
        if !record.changes().iter().any(|column| column != COLUMN_ID) {
            if self.debug {
                debug!(entity = R::ENTITY, id = record.id(), "No changes to update");
            }
            return Ok(());
        }

        record.touch_updated(now_utc());
        let statement = update_by_id(
            &self.table,
            &record.changed_fields(),
            record.id(),
            self.dialect(),
        )?;
        let affected = self.execute_on(executor, "update", &statement).await?;
        if affected == 0 {
            warn!(entity = R::ENTITY, id = record.id(), "Update matched no rows");
        }

        record.mark_clean();
        Ok(())
    }

    /// Hard-deletes the row of `record`
    pub async fn delete(&self, record: &R) -> Result<(), DatabaseError> {
        self.delete_by_id(record.id()).await
    }

    /// Hard-deletes the row with `id`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if `id` is empty
    pub async fn delete_by_id(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_by_id_in(self.db.as_executor(), id).await
    }

    pub async fn delete_by_id_in(
        &self,
        executor: &dyn Executor,
        id: &str,
    ) -> Result<(), DatabaseError> {
        ensure_id::<R>(id)?;
        let statement = delete_by_id(&self.table, id, self.dialect())?;
        self.execute_on(executor, "delete", &statement).await?;
        Ok(())
    }

    /// Marks `record` as deleted now and writes the change
    pub async fn soft_delete(&self, record: &mut R) -> Result<(), DatabaseError> {
        self.soft_delete_in(self.db.as_executor(), record).await
    }

    pub async fn soft_delete_in(
        &self,
        executor: &dyn Executor,
        record: &mut R,
    ) -> Result<(), DatabaseError> {
        ensure_id::<R>(record.id())?;
        record.mark_soft_deleted(now_utc());
        self.update_in(executor, record).await
    }

    /// Loads the record with `id` and soft-deletes it in one transaction
    ///
    /// Returns the record as stored after the change.
    ///
    /// # Errors
    ///
    /// - `DatabaseError::Validation` if `id` is empty
    /// - `DatabaseError::NotFound` if no visible record has `id`; the
    ///   transaction is rolled back
    pub async fn soft_delete_by_id(&self, id: &str) -> Result<R, DatabaseError> {
        ensure_id::<R>(id)?;
        let tx = self.db.begin().await?;

        let found = self.find_by_id_in(tx.as_executor(), id).await;
        let mut record = match found {
            Ok(Some(record)) => record,
            Ok(None) => {
                let missing = DatabaseError::not_found(R::ENTITY, id);
                return Err(rollback(tx, missing).await);
            }
            Err(err) => return Err(rollback(tx, err).await),
        };

        record.mark_soft_deleted(now_utc());
        if let Err(err) = self.update_in(tx.as_executor(), &mut record).await {
            return Err(rollback(tx, err).await);
        }

        tx.commit().await?;
        Ok(record)
    }

    /// Checks whether a visible record with `id` exists
    pub async fn exists(&self, id: &str) -> Result<bool, DatabaseError> {
        self.exists_in(self.db.as_executor(), id).await
    }

    pub async fn exists_in(
        &self,
        executor: &dyn Executor,
        id: &str,
    ) -> Result<bool, DatabaseError> {
        ensure_id::<R>(id)?;
        let mut query = <R::Query as Default>::default();
        query.criteria_mut().id = Some(id.to_string());
        Ok(self.count_in(executor, &query).await? > 0)
    }

    /// Finds the visible record with `id`, `None` when there is none
    pub async fn find_by_id(&self, id: &str) -> Result<Option<R>, DatabaseError> {
        self.find_by_id_in(self.db.as_executor(), id).await
    }

    pub async fn find_by_id_in(
        &self,
        executor: &dyn Executor,
        id: &str,
    ) -> Result<Option<R>, DatabaseError> {
        ensure_id::<R>(id)?;
        let mut query = <R::Query as Default>::default();
        let criteria = query.criteria_mut();
        criteria.id = Some(id.to_string());
        criteria.limit = Some(1);
        Ok(self.list_in(executor, &query).await?.into_iter().next())
    }

    /// Lists the records matching `query` in result-set order
    pub async fn list(&self, query: &R::Query) -> Result<Vec<R>, DatabaseError> {
        self.list_in(self.db.as_executor(), query).await
    }

    pub async fn list_in(
        &self,
        executor: &dyn Executor,
        query: &R::Query,
    ) -> Result<Vec<R>, DatabaseError> {
        let statement = query.compile(&self.table, self.dialect())?;
        let rows = self.fetch_on(executor, "list", &statement).await?;
        rows.iter()
            .map(|row| R::from_fields(row).map_err(DatabaseError::from))
            .collect()
    }

    /// Counts the records matching `query`
    ///
    /// Ordering and pagination in `query` are ignored; `query` itself is not
    /// modified.
    pub async fn count(&self, query: &R::Query) -> Result<u64, DatabaseError> {
        self.count_in(self.db.as_executor(), query).await
    }

    pub async fn count_in(
        &self,
        executor: &dyn Executor,
        query: &R::Query,
    ) -> Result<u64, DatabaseError> {
        let statement = query.compile_count(&self.table, self.dialect())?;
        let rows = self.fetch_on(executor, "count", &statement).await?;
        parse_count(rows.first())
    }

    async fn execute_on(
        &self,
        executor: &dyn Executor,
        operation: &str,
        statement: &Statement,
    ) -> Result<u64, DatabaseError> {
        self.log_statement(operation, statement);
        executor.execute(statement).await
    }

    async fn fetch_on(
        &self,
        executor: &dyn Executor,
        operation: &str,
        statement: &Statement,
    ) -> Result<Vec<Row>, DatabaseError> {
        self.log_statement(operation, statement);
        executor.fetch_rows(statement).await
    }

    fn log_statement(&self, operation: &str, statement: &Statement) {
        if self.debug {
            debug!(
                operation,
                table = %self.table,
                sql = statement.sql(),
                params = ?statement.params(),
                "Executing statement"
            );
        }
    }
}

/// Rolls `tx` back and hands `cause` back to the caller
///
/// A failed rollback is logged; `cause` is still the error reported.
async fn rollback(tx: Box<dyn Transaction>, cause: DatabaseError) -> DatabaseError {
    if let Err(err) = tx.rollback().await {
        error!(error = %err, cause = %cause, "Rollback failed");
    }
    cause
}

fn ensure_id<R: Record>(id: &str) -> Result<(), DatabaseError> {
    if id.trim().is_empty() {
        return Err(DatabaseError::validation(format!("{} id is empty", R::ENTITY)));
    }
    Ok(())
}

fn parse_count(row: Option<&Row>) -> Result<u64, DatabaseError> {
    let raw = row
        .and_then(|row| row.get("count"))
        .ok_or_else(|| DatabaseError::QueryFailed("count returned no rows".to_string()))?;
    raw.trim()
        .parse()
        .map_err(|_| DatabaseError::QueryFailed(format!("count returned '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        let mut row = Row::new();
        row.insert("count".to_string(), "3".to_string());
        assert_eq!(parse_count(Some(&row)).unwrap(), 3);
        assert!(parse_count(None).is_err());

        row.insert("count".to_string(), "three".to_string());
        assert!(matches!(
            parse_count(Some(&row)),
            Err(DatabaseError::QueryFailed(_))
        ));
    }

    struct BrokenTransaction;

    #[async_trait::async_trait]
    impl Executor for BrokenTransaction {
        async fn execute(&self, _statement: &Statement) -> Result<u64, DatabaseError> {
            Ok(0)
        }

        async fn fetch_rows(&self, _statement: &Statement) -> Result<Vec<Row>, DatabaseError> {
            Ok(Vec::new())
        }
    }

    #[async_trait::async_trait]
    impl Transaction for BrokenTransaction {
        async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
            Err(DatabaseError::SqlError(sqlx::Error::PoolClosed))
        }

        fn as_executor(&self) -> &dyn Executor {
            self
        }
    }

    #[tokio::test]
    async fn test_failed_rollback_keeps_the_cause() {
        let cause = DatabaseError::not_found("plan", "p1");
        let reported = rollback(Box::new(BrokenTransaction), cause).await;
        assert!(reported.is_not_found());
    }

    #[test]
    fn test_ensure_id() {
        use domain_subscription::Plan;
        assert!(ensure_id::<Plan>("abc").is_ok());
        assert!(matches!(
            ensure_id::<Plan>(""),
            Err(DatabaseError::Validation(_))
        ));
    }
}
