//! Pre-built Test Fixtures
//!
//! Ready-to-use plans, subscriptions and instants. Every fixture is
//! deterministic apart from the generated record identifiers.

use chrono::{DateTime, TimeZone, Utc};
use domain_subscription::{plan_interval, plan_status, subscription_status, Plan, Subscription};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Start of the standard billing period (Jan 1, 2024)
    pub fn period_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// End of the standard billing period (Jan 31, 2024)
    pub fn period_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()
    }

    /// An instant inside the standard period
    pub fn mid_period() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    /// An instant after the standard period
    pub fn after_period() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap()
    }

    /// A soft-delete instant far in the past
    pub fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for plan test data
pub struct PlanFixtures;

impl PlanFixtures {
    /// Standard monthly price
    pub fn basic_price() -> Decimal {
        dec!(9.99)
    }

    /// An active monthly USD plan
    pub fn basic_monthly() -> Plan {
        let mut plan = Plan::new();
        plan.set_plan_type("basic")
            .set_status(plan_status::ACTIVE)
            .set_title("Basic")
            .set_description("Entry level plan")
            .set_interval(plan_interval::MONTHLY)
            .set_currency("USD")
            .set_price(Self::basic_price())
            .set_stripe_price_id("price_basic_monthly")
            .set_features("reports,exports");
        plan
    }

    /// An active yearly USD plan
    pub fn pro_yearly() -> Plan {
        let mut plan = Plan::new();
        plan.set_plan_type("pro")
            .set_status(plan_status::ACTIVE)
            .set_title("Pro")
            .set_interval(plan_interval::YEARLY)
            .set_currency("USD")
            .set_price(dec!(199.00))
            .set_stripe_price_id("price_pro_yearly");
        plan
    }

    /// A plan as returned by `Plan::new()` with only a title set
    pub fn inactive_draft() -> Plan {
        let mut plan = Plan::new();
        plan.set_title("Draft");
        plan
    }
}

/// Fixture for subscription test data
pub struct SubscriptionFixtures;

impl SubscriptionFixtures {
    /// Subscriber used by the standard fixtures
    pub fn subscriber_id() -> &'static str {
        "user-0001"
    }

    /// An active subscription covering the standard period
    pub fn active_for(plan_id: &str) -> Subscription {
        let mut subscription = Subscription::new();
        subscription
            .set_status(subscription_status::ACTIVE)
            .set_subscriber_id(Self::subscriber_id())
            .set_plan_id(plan_id)
            .set_period_start(TemporalFixtures::period_start())
            .set_period_end(TemporalFixtures::period_end())
            .set_payment_method_id("pm_card_visa");
        subscription
    }

    /// A cancelled subscription that ends with its period
    pub fn cancelled_for(plan_id: &str) -> Subscription {
        let mut subscription = Self::active_for(plan_id);
        subscription
            .set_status(subscription_status::CANCELLED)
            .set_cancel_at_period_end(true);
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_bounds_are_ordered() {
        assert!(TemporalFixtures::period_start() < TemporalFixtures::mid_period());
        assert!(TemporalFixtures::mid_period() < TemporalFixtures::period_end());
        assert!(TemporalFixtures::period_end() < TemporalFixtures::after_period());
    }

    #[test]
    fn test_basic_monthly_plan() {
        let plan = PlanFixtures::basic_monthly();
        assert_eq!(plan.status(), plan_status::ACTIVE);
        assert_eq!(plan.price(), dec!(9.99));
    }

    #[test]
    fn test_active_subscription_covers_mid_period() {
        let subscription = SubscriptionFixtures::active_for("plan-1");
        assert_eq!(subscription.plan_id(), "plan-1");
        assert!(subscription.is_in_period(TemporalFixtures::mid_period()));
        assert!(!subscription.is_in_period(TemporalFixtures::after_period()));
    }
}
