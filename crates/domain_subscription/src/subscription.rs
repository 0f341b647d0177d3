//! Subscriptions
//!
//! A subscription binds a subscriber to a plan for a billing period. Period
//! bounds stay unset until the subscription is first stored, at which point
//! an unset start becomes the creation instant and an unset end becomes the
//! "never" sentinel.

use chrono::{DateTime, Utc};

use subscription_kernel::columns::*;
use subscription_kernel::temporal::is_deleted_at;
use subscription_kernel::{
    human_uid, max_datetime, now_utc, ChangeSet, CoreError, HasMetas, Record, Value,
};

use crate::plan::parse_column_datetime;
use crate::status::subscription_status;

const SUBSCRIPTION_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_STATUS,
    COLUMN_SUBSCRIBER_ID,
    COLUMN_PLAN_ID,
    COLUMN_PERIOD_START,
    COLUMN_PERIOD_END,
    COLUMN_CANCEL_AT_PERIOD_END,
    COLUMN_PAYMENT_METHOD_ID,
    COLUMN_MEMO,
    COLUMN_METAS,
    COLUMN_CREATED_AT,
    COLUMN_UPDATED_AT,
    COLUMN_SOFT_DELETED_AT,
];

const CONSTRUCTOR_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_STATUS,
    COLUMN_SUBSCRIBER_ID,
    COLUMN_PLAN_ID,
    COLUMN_PAYMENT_METHOD_ID,
    COLUMN_CANCEL_AT_PERIOD_END,
    COLUMN_MEMO,
    COLUMN_METAS,
    COLUMN_SOFT_DELETED_AT,
    COLUMN_CREATED_AT,
    COLUMN_UPDATED_AT,
];

/// A subscriber's subscription to a plan
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    id: String,
    status: String,
    subscriber_id: String,
    plan_id: String,
    period_start: Option<DateTime<Utc>>,
    period_end: Option<DateTime<Utc>>,
    cancel_at_period_end: bool,
    payment_method_id: String,
    memo: String,
    metas: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    soft_deleted_at: DateTime<Utc>,
    changes: ChangeSet,
}

impl Subscription {
    /// Creates a new inactive subscription with a fresh identifier
    pub fn new() -> Self {
        let now = now_utc();
        Self {
            id: human_uid(),
            status: subscription_status::INACTIVE.to_string(),
            metas: "{}".to_string(),
            soft_deleted_at: max_datetime(),
            created_at: now,
            updated_at: now,
            changes: ChangeSet::with_columns(CONSTRUCTOR_COLUMNS),
            ..Self::empty()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    text_column!(status, set_status, COLUMN_STATUS);
    text_column!(subscriber_id, set_subscriber_id, COLUMN_SUBSCRIBER_ID);
    text_column!(plan_id, set_plan_id, COLUMN_PLAN_ID);
    text_column!(
        payment_method_id,
        set_payment_method_id,
        COLUMN_PAYMENT_METHOD_ID
    );
    text_column!(memo, set_memo, COLUMN_MEMO);

    pub fn period_start(&self) -> Option<DateTime<Utc>> {
        self.period_start
    }

    pub fn set_period_start(&mut self, start: DateTime<Utc>) -> &mut Self {
        self.period_start = Some(start);
        self.changes.mark(COLUMN_PERIOD_START);
        self
    }

    /// End of the current period; the max sentinel means open-ended
    pub fn period_end(&self) -> Option<DateTime<Utc>> {
        self.period_end
    }

    pub fn set_period_end(&mut self, end: DateTime<Utc>) -> &mut Self {
        self.period_end = Some(end);
        self.changes.mark(COLUMN_PERIOD_END);
        self
    }

    /// Checks whether `at` falls inside the current period, bounds inclusive
    ///
    /// A subscription whose bounds are still unset is never in period.
    pub fn is_in_period(&self, at: DateTime<Utc>) -> bool {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => start <= at && at <= end,
            _ => false,
        }
    }

    pub fn cancel_at_period_end(&self) -> bool {
        self.cancel_at_period_end
    }

    pub fn set_cancel_at_period_end(&mut self, cancel: bool) -> &mut Self {
        self.cancel_at_period_end = cancel;
        self.changes.mark(COLUMN_CANCEL_AT_PERIOD_END);
        self
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) -> &mut Self {
        self.created_at = created_at;
        self.changes.mark(COLUMN_CREATED_AT);
        self
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, updated_at: DateTime<Utc>) -> &mut Self {
        self.updated_at = updated_at;
        self.changes.mark(COLUMN_UPDATED_AT);
        self
    }

    pub fn soft_deleted_at(&self) -> DateTime<Utc> {
        self.soft_deleted_at
    }

    pub fn set_soft_deleted_at(&mut self, soft_deleted_at: DateTime<Utc>) -> &mut Self {
        self.soft_deleted_at = soft_deleted_at;
        self.changes.mark(COLUMN_SOFT_DELETED_AT);
        self
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for Subscription {
    const ENTITY: &'static str = "subscription";
    const COLUMNS: &'static [&'static str] = SUBSCRIPTION_COLUMNS;

    fn empty() -> Self {
        Self {
            id: String::new(),
            status: String::new(),
            subscriber_id: String::new(),
            plan_id: String::new(),
            period_start: None,
            period_end: None,
            cancel_at_period_end: false,
            payment_method_id: String::new(),
            memo: String::new(),
            metas: String::new(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            soft_deleted_at: max_datetime(),
            changes: ChangeSet::new(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, column: &str) -> Option<Value> {
        let value = match column {
            COLUMN_ID => Value::from(self.id.as_str()),
            COLUMN_STATUS => Value::from(self.status.as_str()),
            COLUMN_SUBSCRIBER_ID => Value::from(self.subscriber_id.as_str()),
            COLUMN_PLAN_ID => Value::from(self.plan_id.as_str()),
            COLUMN_PERIOD_START => Value::from(self.period_start),
            COLUMN_PERIOD_END => Value::from(self.period_end),
            COLUMN_CANCEL_AT_PERIOD_END => {
                Value::from(if self.cancel_at_period_end { YES } else { NO })
            }
            COLUMN_PAYMENT_METHOD_ID => Value::from(self.payment_method_id.as_str()),
            COLUMN_MEMO => Value::from(self.memo.as_str()),
            COLUMN_METAS => Value::from(self.metas.as_str()),
            COLUMN_CREATED_AT => Value::DateTime(self.created_at),
            COLUMN_UPDATED_AT => Value::DateTime(self.updated_at),
            COLUMN_SOFT_DELETED_AT => Value::DateTime(self.soft_deleted_at),
            _ => return None,
        };
        Some(value)
    }

    fn assign(&mut self, column: &'static str, raw: &str) -> Result<(), CoreError> {
        match column {
            COLUMN_ID => self.id = raw.to_string(),
            COLUMN_STATUS => self.status = raw.to_string(),
            COLUMN_SUBSCRIBER_ID => self.subscriber_id = raw.to_string(),
            COLUMN_PLAN_ID => self.plan_id = raw.to_string(),
            COLUMN_PERIOD_START => self.period_start = parse_optional_datetime(column, raw)?,
            COLUMN_PERIOD_END => self.period_end = parse_optional_datetime(column, raw)?,
            COLUMN_CANCEL_AT_PERIOD_END => {
                self.cancel_at_period_end = parse_flag(column, raw)?
            }
            COLUMN_PAYMENT_METHOD_ID => self.payment_method_id = raw.to_string(),
            COLUMN_MEMO => self.memo = raw.to_string(),
            COLUMN_METAS => self.metas = raw.to_string(),
            COLUMN_CREATED_AT => self.created_at = parse_column_datetime(column, raw)?,
            COLUMN_UPDATED_AT => self.updated_at = parse_column_datetime(column, raw)?,
            COLUMN_SOFT_DELETED_AT => {
                self.soft_deleted_at = parse_column_datetime(column, raw)?
            }
            other => {
                return Err(CoreError::UnknownField {
                    entity: Self::ENTITY,
                    field: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    fn changes_mut(&mut self) -> &mut ChangeSet {
        &mut self.changes
    }

    /// Also defaults unset period bounds: start to `now`, end to the sentinel
    fn touch_created(&mut self, now: DateTime<Utc>) {
        if self.period_start.is_none() {
            self.set_period_start(now);
        }
        if self.period_end.is_none() {
            self.set_period_end(max_datetime());
        }
        self.set_created_at(now).set_updated_at(now);
    }

    fn touch_updated(&mut self, now: DateTime<Utc>) {
        self.set_updated_at(now);
    }

    fn mark_soft_deleted(&mut self, at: DateTime<Utc>) {
        self.set_soft_deleted_at(at);
    }

    fn is_soft_deleted(&self) -> bool {
        is_deleted_at(self.soft_deleted_at, now_utc())
    }
}

impl HasMetas for Subscription {
    fn metas_raw(&self) -> &str {
        &self.metas
    }

    fn replace_metas_raw(&mut self, raw: String) {
        self.metas = raw;
        self.changes.mark(COLUMN_METAS);
    }
}

fn parse_optional_datetime(
    column: &'static str,
    raw: &str,
) -> Result<Option<DateTime<Utc>>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_column_datetime(column, raw).map(Some)
}

/// Parses a yes/no flag; an empty value reads as "no"
fn parse_flag(column: &'static str, raw: &str) -> Result<bool, CoreError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(YES) {
        Ok(true)
    } else if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO) {
        Ok(false)
    } else {
        Err(CoreError::invalid_value(column, raw, "expected 'yes' or 'no'"))
    }
}
