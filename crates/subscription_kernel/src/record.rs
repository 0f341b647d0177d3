//! The generic record contract
//!
//! Every persisted entity is a typed struct that also exposes a string-keyed
//! view of its columns. The typed view is what repositories bind; the string
//! view is what callers and hydration use. Both views share one `ChangeSet`.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::changes::ChangeSet;
use crate::columns::COLUMN_ID;
use crate::error::CoreError;
use crate::value::Value;

/// String snapshot of a record, keyed by column name
pub type FieldMap = BTreeMap<String, String>;

/// A typed entity with change tracking
///
/// Implementors provide column access and lifecycle hooks; the string views,
/// dirty-set handling and hydration are provided on top of them.
pub trait Record: Sized + Send + Sync {
    /// Entity name used in error messages and logs
    const ENTITY: &'static str;

    /// Columns in schema order
    const COLUMNS: &'static [&'static str];

    /// An unpopulated instance used as the hydration target
    ///
    /// The result carries no identifier and must not be persisted as is.
    #[doc(hidden)]
    fn empty() -> Self;

    fn id(&self) -> &str;

    /// Returns the typed value of a column, or `None` for unknown columns
    fn value(&self, column: &str) -> Option<Value>;

    /// Parses `raw` into the column without touching the change set
    fn assign(&mut self, column: &'static str, raw: &str) -> Result<(), CoreError>;

    fn changes(&self) -> &ChangeSet;

    fn changes_mut(&mut self) -> &mut ChangeSet;

    /// Stamps the creation and update timestamps before an insert
    fn touch_created(&mut self, now: DateTime<Utc>);

    /// Stamps the update timestamp before an update
    fn touch_updated(&mut self, now: DateTime<Utc>);

    /// Sets the soft-delete timestamp
    fn mark_soft_deleted(&mut self, at: DateTime<Utc>);

    /// Checks the soft-delete timestamp against the current instant
    fn is_soft_deleted(&self) -> bool;

    /// Resolves a column name to its static form
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownField` if the entity has no such column
    fn column(name: &str) -> Result<&'static str, CoreError> {
        Self::COLUMNS
            .iter()
            .copied()
            .find(|column| *column == name)
            .ok_or_else(|| CoreError::UnknownField {
                entity: Self::ENTITY,
                field: name.to_string(),
            })
    }

    /// Returns the string form of a column, `None` when unknown or NULL
    fn get(&self, column: &str) -> Option<String> {
        self.value(column).and_then(|value| value.to_portable())
    }

    /// Sets a column from its string form and marks it changed
    ///
    /// # Errors
    ///
    /// - `CoreError::ImmutableField` for `id`
    /// - `CoreError::UnknownField` for columns the entity does not have
    /// - `CoreError::InvalidValue` when `raw` does not parse as the column type
    fn set(&mut self, column: &str, raw: &str) -> Result<&mut Self, CoreError> {
        if column == COLUMN_ID {
            return Err(CoreError::ImmutableField(COLUMN_ID.to_string()));
        }
        let column = Self::column(column)?;
        self.assign(column, raw)?;
        self.changes_mut().mark(column);
        Ok(self)
    }

    /// Builds a record from a loaded row; the change set starts empty
    ///
    /// Keys that are not columns of the entity are ignored.
    fn from_fields(fields: &FieldMap) -> Result<Self, CoreError> {
        let mut record = Self::empty();
        for (name, raw) in fields {
            if let Ok(column) = Self::column(name) {
                record.assign(column, raw)?;
            }
        }
        record.changes_mut().clear();
        Ok(record)
    }

    /// Typed values of every column in schema order
    fn fields(&self) -> Vec<(&'static str, Value)> {
        Self::COLUMNS
            .iter()
            .map(|column| (*column, self.value(column).unwrap_or(Value::Null)))
            .collect()
    }

    /// Typed values of the changed columns in schema order
    fn changed_fields(&self) -> Vec<(&'static str, Value)> {
        self.fields()
            .into_iter()
            .filter(|(column, _)| self.changes().contains(column))
            .collect()
    }

    /// Full string snapshot of the record, NULL columns omitted
    fn data(&self) -> FieldMap {
        to_field_map(self.fields())
    }

    /// String snapshot restricted to the changed columns
    fn data_changed(&self) -> FieldMap {
        to_field_map(self.changed_fields())
    }

    /// Forgets every tracked change
    fn mark_clean(&mut self) {
        self.changes_mut().clear();
    }

    fn is_dirty(&self) -> bool {
        !self.changes().is_empty()
    }
}

fn to_field_map(fields: Vec<(&'static str, Value)>) -> FieldMap {
    fields
        .into_iter()
        .filter_map(|(column, value)| value.to_portable().map(|text| (column.to_string(), text)))
        .collect()
}
