//! SELECT statements
//!
//! A `Select` collects predicates, ordering and pagination against one table
//! and renders them in a fixed clause order:
//! `SELECT .. FROM .. WHERE .. ORDER BY .. LIMIT .. OFFSET ..`.

use std::str::FromStr;

use subscription_kernel::Value;

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::sql::statement::{Statement, StatementBuilder};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

impl Direction {
    /// `asc` in any case is ascending; every other value is descending
    pub fn parse(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("asc") {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Direction::parse(s))
    }
}

/// A single WHERE predicate on a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    Gt(&'static str, Value),
}

impl Condition {
    fn render(&self, builder: &mut StatementBuilder) {
        match self {
            Condition::Eq(column, value) => {
                builder.push_identifier(column).push(" = ").push_bind(value.clone());
            }
            Condition::In(_, values) if values.is_empty() => {
                builder.push("1 = 0");
            }
            Condition::In(column, values) => {
                builder
                    .push_identifier(column)
                    .push(" IN ")
                    .push_bind_list(values.iter().cloned());
            }
            Condition::Gt(column, value) => {
                builder.push_identifier(column).push(" > ").push_bind(value.clone());
            }
        }
    }
}

/// A SELECT against a single table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    table: String,
    conditions: Vec<Condition>,
    order: Option<(&'static str, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
    count_only: bool,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            order: None,
            limit: None,
            offset: None,
            count_only: false,
        }
    }

    pub fn filter(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(&mut self, column: &'static str, direction: Direction) -> &mut Self {
        self.order = Some((column, direction));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Switches to `SELECT COUNT(*)`; ordering and pagination are dropped
    pub fn count_only(&mut self) -> &mut Self {
        self.count_only = true;
        self
    }

    /// Renders the statement for `dialect`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidQuery` if the table name is empty
    pub fn to_statement(&self, dialect: Dialect) -> Result<Statement, DatabaseError> {
        if self.table.trim().is_empty() {
            return Err(DatabaseError::invalid_query("table name is empty"));
        }

        let mut builder = StatementBuilder::new(dialect);
        if self.count_only {
            builder.push("SELECT COUNT(*) AS ").push_identifier("count");
        } else {
            builder.push("SELECT *");
        }
        builder.push(" FROM ").push_identifier(&self.table);

        for (index, condition) in self.conditions.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            condition.render(&mut builder);
        }

        if self.count_only {
            builder.push(" LIMIT ").push_bind(1_i64);
            return Ok(builder.build());
        }

        if let Some((column, direction)) = self.order {
            builder
                .push(" ORDER BY ")
                .push_identifier(column)
                .push(" ")
                .push(direction.as_sql());
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                builder.push(" LIMIT ").push_bind(to_sql_integer(limit));
                if let Some(offset) = offset {
                    builder.push(" OFFSET ").push_bind(to_sql_integer(offset));
                }
            }
            (None, Some(offset)) => {
                if dialect.requires_limit_for_offset() {
                    builder.push(" LIMIT -1");
                }
                builder.push(" OFFSET ").push_bind(to_sql_integer(offset));
            }
            (None, None) => {}
        }

        Ok(builder.build())
    }
}

fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("asc"), Direction::Ascending);
        assert_eq!(Direction::parse("ASC"), Direction::Ascending);
        assert_eq!(Direction::parse("desc"), Direction::Descending);
        assert_eq!(Direction::parse("sideways"), Direction::Descending);
        assert_eq!(Direction::default(), Direction::Descending);
    }

    #[test]
    fn test_clause_order() {
        let mut select = Select::new("plans");
        select
            .filter(Condition::Eq("status", Value::from("active")))
            .order_by("created_at", Direction::Ascending)
            .limit(10)
            .offset(20);
        let statement = select.to_statement(Dialect::Postgres).unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"plans\" WHERE \"status\" = $1 ORDER BY \"created_at\" ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            statement.params(),
            &[Value::from("active"), Value::Integer(10), Value::Integer(20)]
        );
    }

    #[test]
    fn test_sqlite_offset_without_limit() {
        let mut select = Select::new("plans");
        select.offset(5);
        let statement = select.to_statement(Dialect::Sqlite).unwrap();
        assert_eq!(statement.sql(), "SELECT * FROM \"plans\" LIMIT -1 OFFSET ?");
    }

    #[test]
    fn test_count_drops_order_and_pagination() {
        let mut select = Select::new("plans");
        select
            .order_by("title", Direction::Descending)
            .limit(3)
            .offset(1)
            .count_only();
        let statement = select.to_statement(Dialect::Sqlite).unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT COUNT(*) AS \"count\" FROM \"plans\" LIMIT ?"
        );
        assert_eq!(statement.params(), &[Value::Integer(1)]);
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let mut select = Select::new("plans");
        select.filter(Condition::In("id", Vec::new()));
        let statement = select.to_statement(Dialect::Sqlite).unwrap();
        assert_eq!(statement.sql(), "SELECT * FROM \"plans\" WHERE 1 = 0");
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = Select::new(" ").to_statement(Dialect::Sqlite);
        assert!(matches!(result, Err(DatabaseError::InvalidQuery(_))));
    }
}
