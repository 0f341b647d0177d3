use domain_subscription::Plan;
use subscription_kernel::columns::COLUMN_TYPE;
use subscription_kernel::Value;

use super::{Criteria, RecordQuery};
use crate::sql::{Condition, Select};

/// Filter over the plan table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanQuery {
    criteria: Criteria,
    plan_type: Option<String>,
}

impl PlanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to plans whose `type` column equals `plan_type`
    pub fn with_plan_type(mut self, plan_type: impl Into<String>) -> Self {
        self.plan_type = Some(plan_type.into());
        self
    }

    pub fn plan_type(&self) -> Option<&str> {
        self.plan_type.as_deref()
    }
}

criteria_builders!(PlanQuery);

impl RecordQuery for PlanQuery {
    type Record = Plan;

    fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    fn criteria_mut(&mut self) -> &mut Criteria {
        &mut self.criteria
    }

    fn push_entity_filters(&self, select: &mut Select) {
        if let Some(plan_type) = &self.plan_type {
            select.filter(Condition::Eq(COLUMN_TYPE, Value::from(plan_type.as_str())));
        }
    }
}
