//! Repository implementations for the stored entities
//!
//! Both entities share the generic `Repository`; this module binds each one
//! to its query type.

mod repository;

pub use repository::{Queryable, Repository};

use domain_subscription::{Plan, Subscription};

use crate::query::{PlanQuery, SubscriptionQuery};

impl Queryable for Plan {
    type Query = PlanQuery;
}

impl Queryable for Subscription {
    type Query = SubscriptionQuery;
}

/// Repository for plans
pub type PlanRepository = Repository<Plan>;

/// Repository for subscriptions
pub type SubscriptionRepository = Repository<Subscription>;
