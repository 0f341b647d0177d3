//! Dirty-field tracking
//!
//! A `ChangeSet` records which columns of a record were mutated since it was
//! constructed, hydrated, or last marked clean. Repositories use it to build
//! minimal UPDATE statements.

use std::collections::BTreeSet;

/// The set of column names changed since the last clean point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    columns: BTreeSet<&'static str>,
}

impl ChangeSet {
    /// Creates an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a change set with the given columns already marked
    pub fn with_columns(columns: &[&'static str]) -> Self {
        Self {
            columns: columns.iter().copied().collect(),
        }
    }

    /// Marks a column as changed
    pub fn mark(&mut self, column: &'static str) {
        self.columns.insert(column);
    }

    /// Checks whether a column is marked
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Forgets every marked column
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Iterates the marked columns in name order
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_clear() {
        let mut changes = ChangeSet::new();
        changes.mark("title");
        changes.mark("title");
        changes.mark("price");

        assert_eq!(changes.len(), 2);
        assert!(changes.contains("title"));

        changes.clear();
        assert!(changes.is_empty());
    }
}
