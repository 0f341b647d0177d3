//! Query filters and their compilation to SQL
//!
//! A query is a sparse set of optional criteria. Compilation walks them in a
//! fixed order so the same query always yields the same statement:
//!
//! 1. equality and set predicates: id, id set, status, status set, then the
//!    entity-specific columns
//! 2. offset and limit, when strictly positive and not counting
//! 3. ordering, descending unless the direction is `asc`
//! 4. the soft-delete visibility predicate, unless soft-deleted rows are
//!    included
//!
//! # Example
//!
//! ```rust
//! use infra_db::query::{PlanQuery, RecordQuery};
//! use infra_db::Dialect;
//!
//! let statement = PlanQuery::new()
//!     .with_status("active")
//!     .with_order_by("created_at")
//!     .compile("plans", Dialect::Postgres)
//!     .unwrap();
//!
//! assert_eq!(
//!     statement.sql(),
//!     "SELECT * FROM \"plans\" WHERE \"status\" = $1 AND \"soft_deleted_at\" > $2 \
//!      ORDER BY \"created_at\" DESC"
//! );
//! ```

#[macro_use]
mod criteria;
mod plan;
mod subscription;

pub use criteria::Criteria;
pub use plan::PlanQuery;
pub use subscription::SubscriptionQuery;

use subscription_kernel::columns::{COLUMN_ID, COLUMN_SOFT_DELETED_AT, COLUMN_STATUS};
use subscription_kernel::{now_utc, Record, Value};

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::sql::{Condition, Select, Statement};

/// A filter over the rows of one entity's table
pub trait RecordQuery: Clone + Default + Send + Sync {
    /// The entity whose columns this query may reference
    type Record: Record;

    fn criteria(&self) -> &Criteria;

    fn criteria_mut(&mut self) -> &mut Criteria;

    /// Adds the predicates that only this entity has
    fn push_entity_filters(&self, select: &mut Select);

    /// Builds the `Select` for `table`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidQuery` if `order_by` names a column the
    /// entity does not have
    fn to_select(&self, table: &str) -> Result<Select, DatabaseError> {
        let criteria = self.criteria();
        let mut select = Select::new(table);

        if let Some(id) = &criteria.id {
            select.filter(Condition::Eq(COLUMN_ID, Value::from(id.as_str())));
        }
        if let Some(ids) = &criteria.id_in {
            select.filter(Condition::In(COLUMN_ID, text_values(ids)));
        }
        if let Some(status) = &criteria.status {
            select.filter(Condition::Eq(COLUMN_STATUS, Value::from(status.as_str())));
        }
        if let Some(statuses) = &criteria.status_in {
            select.filter(Condition::In(COLUMN_STATUS, text_values(statuses)));
        }
        self.push_entity_filters(&mut select);

        if criteria.count_only {
            select.count_only();
        } else {
            if let Some(offset) = criteria.effective_offset() {
                select.offset(offset);
            }
            if let Some(limit) = criteria.effective_limit() {
                select.limit(limit);
            }
            if let Some(order_by) = &criteria.order_by {
                let column = <Self::Record as Record>::column(order_by).map_err(|_| {
                    DatabaseError::invalid_query(format!(
                        "cannot order {} by unknown column '{}'",
                        <Self::Record as Record>::ENTITY,
                        order_by
                    ))
                })?;
                select.order_by(column, criteria.effective_direction());
            }
        }

        if !criteria.include_soft_deleted {
            select.filter(Condition::Gt(
                COLUMN_SOFT_DELETED_AT,
                Value::DateTime(now_utc()),
            ));
        }

        Ok(select)
    }

    /// Compiles the query into a SELECT statement
    fn compile(&self, table: &str, dialect: Dialect) -> Result<Statement, DatabaseError> {
        self.to_select(table)?.to_statement(dialect)
    }

    /// Compiles a count-only copy of the query, leaving `self` untouched
    fn compile_count(&self, table: &str, dialect: Dialect) -> Result<Statement, DatabaseError> {
        let mut counting = self.clone();
        counting.criteria_mut().count_only = true;
        counting.compile(table, dialect)
    }
}

pub(crate) fn text_values(values: &[String]) -> Vec<Value> {
    values.iter().map(|value| Value::from(value.as_str())).collect()
}
