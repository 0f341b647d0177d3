//! Test Data Builders
//!
//! Builder patterns for constructing test records with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::{DateTime, Utc};
use domain_subscription::{plan_interval, plan_status, subscription_status, Plan, Subscription};
use rust_decimal::Decimal;
use subscription_kernel::columns::COLUMN_ID;
use subscription_kernel::{HasMetas, Metas, Record};

use crate::fixtures::{PlanFixtures, SubscriptionFixtures, TemporalFixtures};

/// Builder for constructing test plans
pub struct TestPlanBuilder {
    id: Option<String>,
    plan_type: String,
    status: String,
    title: String,
    interval: String,
    currency: String,
    price: Decimal,
    memo: String,
    metas: Metas,
    soft_deleted_at: Option<DateTime<Utc>>,
}

impl Default for TestPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPlanBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            plan_type: "basic".to_string(),
            status: plan_status::ACTIVE.to_string(),
            title: "Test Plan".to_string(),
            interval: plan_interval::MONTHLY.to_string(),
            currency: "USD".to_string(),
            price: PlanFixtures::basic_price(),
            memo: String::new(),
            metas: Metas::new(),
            soft_deleted_at: None,
        }
    }

    /// Overrides the generated identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_plan_type(mut self, plan_type: impl Into<String>) -> Self {
        self.plan_type = plan_type.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metas.insert(key.into(), value.into());
        self
    }

    /// Marks the plan soft-deleted at the given instant
    pub fn soft_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.soft_deleted_at = Some(at);
        self
    }

    /// Shorthand for a plan soft-deleted long ago
    pub fn soft_deleted(self) -> Self {
        self.soft_deleted_at(TemporalFixtures::long_ago())
    }

    /// Builds the plan; every column set here is reported as changed
    pub fn build(self) -> Plan {
        let mut plan = Plan::new();
        if let Some(id) = self.id {
            plan.assign(COLUMN_ID, &id).expect("ids always assign");
        }
        plan.set_plan_type(self.plan_type)
            .set_status(self.status)
            .set_title(self.title)
            .set_interval(self.interval)
            .set_currency(self.currency)
            .set_price(self.price)
            .set_memo(self.memo);
        if !self.metas.is_empty() {
            plan.set_metas(&self.metas).expect("meta maps always encode");
        }
        if let Some(at) = self.soft_deleted_at {
            plan.set_soft_deleted_at(at);
        }
        plan
    }
}

/// Builder for constructing test subscriptions
pub struct TestSubscriptionBuilder {
    id: Option<String>,
    status: String,
    subscriber_id: String,
    plan_id: String,
    period_start: Option<DateTime<Utc>>,
    period_end: Option<DateTime<Utc>>,
    cancel_at_period_end: bool,
    payment_method_id: String,
    soft_deleted_at: Option<DateTime<Utc>>,
}

impl Default for TestSubscriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSubscriptionBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            status: subscription_status::ACTIVE.to_string(),
            subscriber_id: SubscriptionFixtures::subscriber_id().to_string(),
            plan_id: String::new(),
            period_start: Some(TemporalFixtures::period_start()),
            period_end: Some(TemporalFixtures::period_end()),
            cancel_at_period_end: false,
            payment_method_id: String::new(),
            soft_deleted_at: None,
        }
    }

    /// Overrides the generated identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_subscriber_id(mut self, subscriber_id: impl Into<String>) -> Self {
        self.subscriber_id = subscriber_id.into();
        self
    }

    pub fn with_plan_id(mut self, plan_id: impl Into<String>) -> Self {
        self.plan_id = plan_id.into();
        self
    }

    pub fn with_period(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.period_start = Some(start);
        self.period_end = Some(end);
        self
    }

    /// Leaves both period bounds unset
    pub fn without_period(mut self) -> Self {
        self.period_start = None;
        self.period_end = None;
        self
    }

    pub fn cancel_at_period_end(mut self, cancel: bool) -> Self {
        self.cancel_at_period_end = cancel;
        self
    }

    pub fn with_payment_method_id(mut self, payment_method_id: impl Into<String>) -> Self {
        self.payment_method_id = payment_method_id.into();
        self
    }

    pub fn soft_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.soft_deleted_at = Some(at);
        self
    }

    pub fn soft_deleted(self) -> Self {
        self.soft_deleted_at(TemporalFixtures::long_ago())
    }

    /// Builds the subscription
    pub fn build(self) -> Subscription {
        let mut subscription = Subscription::new();
        if let Some(id) = self.id {
            subscription.assign(COLUMN_ID, &id).expect("ids always assign");
        }
        subscription
            .set_status(self.status)
            .set_subscriber_id(self.subscriber_id)
            .set_plan_id(self.plan_id)
            .set_cancel_at_period_end(self.cancel_at_period_end)
            .set_payment_method_id(self.payment_method_id);
        if let Some(start) = self.period_start {
            subscription.set_period_start(start);
        }
        if let Some(end) = self.period_end {
            subscription.set_period_end(end);
        }
        if let Some(at) = self.soft_deleted_at {
            subscription.set_soft_deleted_at(at);
        }
        subscription
    }
}
