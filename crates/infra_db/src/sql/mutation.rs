//! INSERT, UPDATE and DELETE statements keyed by record id

use subscription_kernel::columns::COLUMN_ID;
use subscription_kernel::Value;

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::sql::statement::{Statement, StatementBuilder};

/// Builds `INSERT INTO <table> (<columns>) VALUES (<params>)`
///
/// # Errors
///
/// Returns `DatabaseError::InvalidQuery` for an empty table name or no columns
pub fn insert(
    table: &str,
    fields: &[(&'static str, Value)],
    dialect: Dialect,
) -> Result<Statement, DatabaseError> {
    ensure_table(table)?;
    if fields.is_empty() {
        return Err(DatabaseError::invalid_query("insert without columns"));
    }

    let mut builder = StatementBuilder::new(dialect);
    builder.push("INSERT INTO ").push_identifier(table).push(" (");
    for (index, (column, _)) in fields.iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push_identifier(column);
    }
    builder
        .push(") VALUES ")
        .push_bind_list(fields.iter().map(|(_, value)| value.clone()));
    Ok(builder.build())
}

/// Builds `UPDATE <table> SET <column = param, ..> WHERE "id" = <param>`
///
/// `id` is never part of the SET list, even if present in `fields`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidQuery` when nothing is left to set
pub fn update_by_id(
    table: &str,
    fields: &[(&'static str, Value)],
    id: &str,
    dialect: Dialect,
) -> Result<Statement, DatabaseError> {
    ensure_table(table)?;

    let mut builder = StatementBuilder::new(dialect);
    builder.push("UPDATE ").push_identifier(table).push(" SET ");
    let mut assigned = 0;
    for (column, value) in fields.iter().filter(|(column, _)| *column != COLUMN_ID) {
        if assigned > 0 {
            builder.push(", ");
        }
        builder
            .push_identifier(column)
            .push(" = ")
            .push_bind(value.clone());
        assigned += 1;
    }
    if assigned == 0 {
        return Err(DatabaseError::invalid_query("update without columns"));
    }

    builder
        .push(" WHERE ")
        .push_identifier(COLUMN_ID)
        .push(" = ")
        .push_bind(id);
    Ok(builder.build())
}

/// Builds `DELETE FROM <table> WHERE "id" = <param>`
pub fn delete_by_id(table: &str, id: &str, dialect: Dialect) -> Result<Statement, DatabaseError> {
    ensure_table(table)?;

    let mut builder = StatementBuilder::new(dialect);
    builder
        .push("DELETE FROM ")
        .push_identifier(table)
        .push(" WHERE ")
        .push_identifier(COLUMN_ID)
        .push(" = ")
        .push_bind(id);
    Ok(builder.build())
}

fn ensure_table(table: &str) -> Result<(), DatabaseError> {
    if table.trim().is_empty() {
        return Err(DatabaseError::invalid_query("table name is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insert() {
        let fields = vec![("id", Value::from("p1")), ("price", Value::from(dec!(9.50)))];
        let statement = insert("plans", &fields, Dialect::Postgres).unwrap();

        assert_eq!(
            statement.sql(),
            "INSERT INTO \"plans\" (\"id\", \"price\") VALUES ($1, $2)"
        );
        assert_eq!(statement.params().len(), 2);
    }

    #[test]
    fn test_update_skips_id() {
        let fields = vec![("id", Value::from("p1")), ("title", Value::from("Pro"))];
        let statement = update_by_id("plans", &fields, "p1", Dialect::Sqlite).unwrap();

        assert_eq!(
            statement.sql(),
            "UPDATE \"plans\" SET \"title\" = ? WHERE \"id\" = ?"
        );
        assert_eq!(statement.params(), &[Value::from("Pro"), Value::from("p1")]);
    }

    #[test]
    fn test_update_with_only_id_is_rejected() {
        let fields = vec![("id", Value::from("p1"))];
        let result = update_by_id("plans", &fields, "p1", Dialect::Sqlite);
        assert!(matches!(result, Err(DatabaseError::InvalidQuery(_))));
    }

    #[test]
    fn test_delete() {
        let statement = delete_by_id("subscriptions", "s1", Dialect::Postgres).unwrap();
        assert_eq!(
            statement.sql(),
            "DELETE FROM \"subscriptions\" WHERE \"id\" = $1"
        );
    }
}
