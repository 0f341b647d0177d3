use domain_subscription::Subscription;
use subscription_kernel::columns::{COLUMN_PLAN_ID, COLUMN_SUBSCRIBER_ID};
use subscription_kernel::Value;

use super::{Criteria, RecordQuery};
use crate::sql::{Condition, Select};

/// Filter over the subscription table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionQuery {
    criteria: Criteria,
    subscriber_id: Option<String>,
    plan_id: Option<String>,
}

impl SubscriptionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriber_id(mut self, subscriber_id: impl Into<String>) -> Self {
        self.subscriber_id = Some(subscriber_id.into());
        self
    }

    pub fn with_plan_id(mut self, plan_id: impl Into<String>) -> Self {
        self.plan_id = Some(plan_id.into());
        self
    }

    pub fn subscriber_id(&self) -> Option<&str> {
        self.subscriber_id.as_deref()
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.plan_id.as_deref()
    }
}

criteria_builders!(SubscriptionQuery);

impl RecordQuery for SubscriptionQuery {
    type Record = Subscription;

    fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut Criteria {
        &mut self.criteria
    }

    fn push_entity_filters(&self, select: &mut Select) {
        if let Some(subscriber_id) = &self.subscriber_id {
            select.filter(Condition::Eq(
                COLUMN_SUBSCRIBER_ID,
                Value::from(subscriber_id.as_str()),
            ));
        }
        if let Some(plan_id) = &self.plan_id {
            select.filter(Condition::Eq(COLUMN_PLAN_ID, Value::from(plan_id.as_str())));
        }
    }
}
