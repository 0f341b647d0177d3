//! Subscription Kernel - Foundational types for the subscription store
//!
//! This crate provides the building blocks shared by every persisted entity:
//! - Human-readable, time-ordered identifiers
//! - UTC timestamp handling with the "never" sentinel
//! - The typed `Value` scalar that crosses the database boundary
//! - Change tracking (`ChangeSet`) and the generic `Record` contract
//! - JSON-encoded meta maps (`HasMetas`)

pub mod changes;
pub mod columns;
pub mod error;
pub mod identifiers;
pub mod metas;
pub mod record;
pub mod temporal;
pub mod value;

pub use changes::ChangeSet;
pub use error::CoreError;
pub use identifiers::human_uid;
pub use metas::{HasMetas, Metas};
pub use record::{FieldMap, Record};
pub use temporal::{format_datetime, max_datetime, now_utc, parse_datetime, TemporalError};
pub use value::Value;
