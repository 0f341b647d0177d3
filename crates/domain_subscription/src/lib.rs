//! Domain entities of the subscription store
//!
//! A `Plan` describes something a customer can subscribe to; a `Subscription`
//! binds a subscriber to a plan for a billing period. Both are typed records
//! with change tracking (see `subscription_kernel::Record`) and JSON metas.
//!
//! # Example
//!
//! ```rust
//! use domain_subscription::{plan_interval, Plan};
//! use rust_decimal::Decimal;
//! use subscription_kernel::Record;
//!
//! let mut plan = Plan::new();
//! plan.set_title("Pro")
//!     .set_interval(plan_interval::MONTHLY)
//!     .set_price(Decimal::new(1999, 2));
//!
//! assert_eq!(plan.get("price").as_deref(), Some("19.99"));
//! assert!(plan.is_dirty());
//! ```

#[macro_use]
mod macros;

pub mod plan;
pub mod status;
pub mod subscription;

pub use plan::{normalize_price, Plan, PRICE_SCALE};
pub use status::{plan_interval, plan_status, subscription_status};
pub use subscription::Subscription;
