//! Row counts reported at startup

use std::fmt;

use domain_subscription::{plan_status, subscription_status};
use infra_db::{DatabaseError, PlanQuery, SubscriptionQuery, SubscriptionStore};

/// Visible and soft-deleted row counts of a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub plans: u64,
    pub active_plans: u64,
    pub deleted_plans: u64,
    pub subscriptions: u64,
    pub active_subscriptions: u64,
    pub deleted_subscriptions: u64,
}

impl StoreReport {
    /// Counts the rows of both tables
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a count
    pub async fn collect(store: &SubscriptionStore) -> Result<Self, DatabaseError> {
        let plans = store.plans();
        let subscriptions = store.subscriptions();

        let visible_plans = plans.count(&PlanQuery::new()).await?;
        let all_plans = plans
            .count(&PlanQuery::new().with_soft_deleted_included(true))
            .await?;
        let visible_subscriptions = subscriptions.count(&SubscriptionQuery::new()).await?;
        let all_subscriptions = subscriptions
            .count(&SubscriptionQuery::new().with_soft_deleted_included(true))
            .await?;

        Ok(Self {
            plans: visible_plans,
            active_plans: plans
                .count(&PlanQuery::new().with_status(plan_status::ACTIVE))
                .await?,
            deleted_plans: all_plans.saturating_sub(visible_plans),
            subscriptions: visible_subscriptions,
            active_subscriptions: subscriptions
                .count(&SubscriptionQuery::new().with_status(subscription_status::ACTIVE))
                .await?,
            deleted_subscriptions: all_subscriptions.saturating_sub(visible_subscriptions),
        })
    }
}

impl fmt::Display for StoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plans: {} ({} active, {} deleted); subscriptions: {} ({} active, {} deleted)",
            self.plans,
            self.active_plans,
            self.deleted_plans,
            self.subscriptions,
            self.active_subscriptions,
            self.deleted_subscriptions
        )
    }
}
