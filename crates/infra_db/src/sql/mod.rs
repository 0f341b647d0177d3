//! SQL statement builders
//!
//! Every value reaches the database as a bound parameter; only identifiers
//! known to the schema are written into the SQL text.

pub mod mutation;
pub mod select;
pub mod statement;

pub use mutation::{delete_by_id, insert, update_by_id};
pub use select::{Condition, Direction, Select};
pub use statement::{Statement, StatementBuilder};
