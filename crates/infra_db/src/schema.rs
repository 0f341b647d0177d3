//! Table schemas and DDL
//!
//! Tables are only ever created, never altered: migration is a
//! `CREATE TABLE IF NOT EXISTS` per entity.

use subscription_kernel::columns::*;

use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::sql::Statement;

/// Semantic column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Bounded string; `None` renders as `VARCHAR(255)`
    String(Option<u16>),
    Text,
    Decimal { precision: u8, scale: u8 },
    DateTime,
}

impl ColumnType {
    pub fn to_sql(&self, dialect: Dialect) -> String {
        match self {
            ColumnType::String(length) => format!("VARCHAR({})", length.unwrap_or(255)),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Decimal { precision, scale } => {
                format!("{}({},{})", dialect.decimal_type(), precision, scale)
            }
            ColumnType::DateTime => dialect.datetime_type().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub primary_key: bool,
}

impl ColumnDefinition {
    fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: false,
        }
    }

    fn primary(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: true,
        }
    }
}

/// A named table and its columns in creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableSchema {
    /// Schema of the plan table
    pub fn plan(name: impl Into<String>) -> Self {
        use ColumnType::*;
        Self {
            name: name.into(),
            columns: vec![
                ColumnDefinition::primary(COLUMN_ID, String(Some(40))),
                ColumnDefinition::new(COLUMN_TYPE, String(Some(50))),
                ColumnDefinition::new(COLUMN_STATUS, String(Some(40))),
                ColumnDefinition::new(COLUMN_TITLE, String(Some(100))),
                ColumnDefinition::new(COLUMN_DESCRIPTION, Text),
                ColumnDefinition::new(COLUMN_INTERVAL, String(None)),
                ColumnDefinition::new(COLUMN_CURRENCY, String(None)),
                ColumnDefinition::new(
                    COLUMN_PRICE,
                    Decimal {
                        precision: 10,
                        scale: 2,
                    },
                ),
                ColumnDefinition::new(COLUMN_STRIPE_PRICE_ID, String(Some(100))),
                ColumnDefinition::new(COLUMN_FEATURES, Text),
                ColumnDefinition::new(COLUMN_MEMO, Text),
                ColumnDefinition::new(COLUMN_METAS, Text),
                ColumnDefinition::new(COLUMN_CREATED_AT, DateTime),
                ColumnDefinition::new(COLUMN_UPDATED_AT, DateTime),
                ColumnDefinition::new(COLUMN_SOFT_DELETED_AT, DateTime),
            ],
        }
    }

    /// Schema of the subscription table
    pub fn subscription(name: impl Into<String>) -> Self {
        use ColumnType::*;
        Self {
            name: name.into(),
            columns: vec![
                ColumnDefinition::primary(COLUMN_ID, String(Some(40))),
                ColumnDefinition::new(COLUMN_STATUS, String(Some(40))),
                ColumnDefinition::new(COLUMN_SUBSCRIBER_ID, String(Some(50))),
                ColumnDefinition::new(COLUMN_PLAN_ID, String(Some(50))),
                ColumnDefinition::new(COLUMN_PERIOD_START, DateTime),
                ColumnDefinition::new(COLUMN_PERIOD_END, DateTime),
                ColumnDefinition::new(COLUMN_CANCEL_AT_PERIOD_END, String(Some(3))),
                ColumnDefinition::new(COLUMN_PAYMENT_METHOD_ID, String(Some(40))),
                ColumnDefinition::new(COLUMN_MEMO, Text),
                ColumnDefinition::new(COLUMN_METAS, Text),
                ColumnDefinition::new(COLUMN_CREATED_AT, DateTime),
                ColumnDefinition::new(COLUMN_UPDATED_AT, DateTime),
                ColumnDefinition::new(COLUMN_SOFT_DELETED_AT, DateTime),
            ],
        }
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` for `dialect`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidQuery` if the table name is empty or
    /// the schema has no columns
    pub fn create_table_sql(&self, dialect: Dialect) -> Result<String, DatabaseError> {
        if self.name.trim().is_empty() {
            return Err(DatabaseError::invalid_query("table name is empty"));
        }
        if self.columns.is_empty() {
            return Err(DatabaseError::invalid_query(format!(
                "table '{}' has no columns",
                self.name
            )));
        }

        let columns = self
            .columns
            .iter()
            .map(|column| {
                let mut definition = format!(
                    "{} {}",
                    dialect.quote_identifier(column.name),
                    column.column_type.to_sql(dialect)
                );
                if column.primary_key {
                    definition.push_str(" NOT NULL PRIMARY KEY");
                }
                definition
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            dialect.quote_identifier(&self.name),
            columns
        ))
    }

    pub fn create_table_statement(&self, dialect: Dialect) -> Result<Statement, DatabaseError> {
        self.create_table_sql(dialect).map(Statement::raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_subscription::{Plan, Subscription};
    use subscription_kernel::Record;

    #[test]
    fn test_schemas_cover_record_columns() {
        assert_eq!(TableSchema::plan("plans").column_names(), Plan::COLUMNS);
        assert_eq!(
            TableSchema::subscription("subscriptions").column_names(),
            Subscription::COLUMNS
        );
    }

    #[test]
    fn test_dialect_specific_types() {
        let schema = TableSchema::plan("plans");

        let sqlite = schema.create_table_sql(Dialect::Sqlite).unwrap();
        assert!(sqlite.starts_with("CREATE TABLE IF NOT EXISTS \"plans\" ("));
        assert!(sqlite.contains("\"id\" VARCHAR(40) NOT NULL PRIMARY KEY"));
        assert!(sqlite.contains("\"interval\" VARCHAR(255)"));
        assert!(sqlite.contains("\"price\" DECIMAL(10,2)"));
        assert!(sqlite.contains("\"created_at\" DATETIME"));

        let postgres = schema.create_table_sql(Dialect::Postgres).unwrap();
        assert!(postgres.contains("\"price\" NUMERIC(10,2)"));
        assert!(postgres.contains("\"created_at\" TIMESTAMP"));
    }

    #[test]
    fn test_empty_table_name_is_rejected() {
        let result = TableSchema::subscription("").create_table_sql(Dialect::Sqlite);
        assert!(matches!(result, Err(DatabaseError::InvalidQuery(_))));
    }
}
