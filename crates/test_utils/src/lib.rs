//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! subscription store test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built plans, subscriptions and instants
//! - `builders`: Builder patterns for test records
//! - `database`: In-memory SQLite stores and PostgreSQL containers
//! - `assertions`: Assertion helpers for records and timestamps
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
