//! Accessor generators shared by the entity types

/// Generates a `&str` getter and a change-tracking setter for a text column
///
/// The struct must have a `String` field named like the getter and a
/// `changes: ChangeSet` field.
macro_rules! text_column {
    ($(#[$meta:meta])* $field:ident, $setter:ident, $column:expr) => {
        $(#[$meta])*
        pub fn $field(&self) -> &str {
            &self.$field
        }

        pub fn $setter(&mut self, value: impl Into<String>) -> &mut Self {
            self.$field = value.into();
            self.changes.mark($column);
            self
        }
    };
}
