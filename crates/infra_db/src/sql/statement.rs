//! Parameterized statements
//!
//! `StatementBuilder` appends SQL fragments and bound values, numbering
//! placeholders for the target dialect as it goes.

use subscription_kernel::Value;

use crate::dialect::Dialect;

/// A compiled SQL statement with its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    /// Wraps SQL that takes no parameters, such as DDL
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Incremental builder for a `Statement`
#[derive(Debug)]
pub struct StatementBuilder {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
}

impl StatementBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Appends a raw SQL fragment
    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Appends a quoted identifier
    pub fn push_identifier(&mut self, identifier: &str) -> &mut Self {
        let quoted = self.dialect.quote_identifier(identifier);
        self.sql.push_str(&quoted);
        self
    }

    /// Appends a placeholder bound to `value`
    ///
    /// NULL is written as a literal so that no typed parameter is needed for it.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if value.is_null() {
            self.sql.push_str("NULL");
            return self;
        }
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
        self
    }

    /// Appends `(p1, p2, ...)` bound to `values`
    pub fn push_bind_list<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.sql.push('(');
        for (index, value) in values.into_iter().enumerate() {
            if index > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(value);
        }
        self.sql.push(')');
        self
    }

    pub fn build(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}
