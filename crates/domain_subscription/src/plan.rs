//! Subscription plans
//!
//! A plan is the priced offer a subscription points at: its title, billing
//! interval, currency and price, plus the Stripe price it maps to.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use subscription_kernel::columns::*;
use subscription_kernel::temporal::is_deleted_at;
use subscription_kernel::{
    human_uid, max_datetime, now_utc, parse_datetime, ChangeSet, CoreError, HasMetas, Record,
    Value,
};

use crate::status::plan_status;

/// Decimal places kept for a price, matching the `NUMERIC(10,2)` column
pub const PRICE_SCALE: u32 = 2;

const PLAN_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_TYPE,
    COLUMN_STATUS,
    COLUMN_TITLE,
    COLUMN_DESCRIPTION,
    COLUMN_INTERVAL,
    COLUMN_CURRENCY,
    COLUMN_PRICE,
    COLUMN_STRIPE_PRICE_ID,
    COLUMN_FEATURES,
    COLUMN_MEMO,
    COLUMN_METAS,
    COLUMN_CREATED_AT,
    COLUMN_UPDATED_AT,
    COLUMN_SOFT_DELETED_AT,
];

/// Columns the constructor initialises, and therefore reports as changed
const CONSTRUCTOR_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_STATUS,
    COLUMN_STRIPE_PRICE_ID,
    COLUMN_DESCRIPTION,
    COLUMN_FEATURES,
    COLUMN_MEMO,
    COLUMN_METAS,
    COLUMN_SOFT_DELETED_AT,
    COLUMN_CREATED_AT,
    COLUMN_UPDATED_AT,
];

/// A subscription plan
///
/// # Example
///
/// ```rust
/// use domain_subscription::{plan_status, Plan};
/// use subscription_kernel::Record;
///
/// let mut plan = Plan::new();
/// plan.set_title("Starter").set_status(plan_status::ACTIVE);
/// plan.mark_clean();
///
/// plan.set_memo("internal");
/// assert_eq!(plan.data_changed().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    id: String,
    plan_type: String,
    status: String,
    title: String,
    description: String,
    interval: String,
    currency: String,
    price: Decimal,
    stripe_price_id: String,
    features: String,
    memo: String,
    metas: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    soft_deleted_at: DateTime<Utc>,
    changes: ChangeSet,
}

impl Plan {
    /// Creates a new inactive plan with a fresh identifier
    ///
    /// Every column the constructor initialises is reported as changed until
    /// the plan is marked clean.
    pub fn new() -> Self {
        let now = now_utc();
        Self {
            id: human_uid(),
            status: plan_status::INACTIVE.to_string(),
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

    text_column!(
        /// The plan kind, stored in the `type` column
        plan_type,
        set_plan_type,
        COLUMN_TYPE
    );
    text_column!(status, set_status, COLUMN_STATUS);
    text_column!(title, set_title, COLUMN_TITLE);
    text_column!(description, set_description, COLUMN_DESCRIPTION);
    text_column!(
        /// Billing interval, see `plan_interval`
        interval,
        set_interval,
        COLUMN_INTERVAL
    );
    text_column!(currency, set_currency, COLUMN_CURRENCY);
    text_column!(stripe_price_id, set_stripe_price_id, COLUMN_STRIPE_PRICE_ID);
    text_column!(features, set_features, COLUMN_FEATURES);
    text_column!(memo, set_memo, COLUMN_MEMO);

    /// The price, always carrying `PRICE_SCALE` decimal places
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// The price as a float, for display and comparisons that tolerate rounding
    pub fn price_float(&self) -> f64 {
        self.price.to_f64().unwrap_or_default()
    }

    /// Sets the price, rounding half away from zero to `PRICE_SCALE` places
    pub fn set_price(&mut self, price: Decimal) -> &mut Self {
        self.price = normalize_price(price);
        self.changes.mark(COLUMN_PRICE);
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

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for Plan {
    const ENTITY: &'static str = "plan";
    const COLUMNS: &'static [&'static str] = PLAN_COLUMNS;

    fn empty() -> Self {
        Self {
            id: String::new(),
            plan_type: String::new(),
            status: String::new(),
            title: String::new(),
            description: String::new(),
            interval: String::new(),
            currency: String::new(),
            price: normalize_price(Decimal::ZERO),
            stripe_price_id: String::new(),
            features: String::new(),
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
            COLUMN_TYPE => Value::from(self.plan_type.as_str()),
            COLUMN_STATUS => Value::from(self.status.as_str()),
            COLUMN_TITLE => Value::from(self.title.as_str()),
            COLUMN_DESCRIPTION => Value::from(self.description.as_str()),
            COLUMN_INTERVAL => Value::from(self.interval.as_str()),
            COLUMN_CURRENCY => Value::from(self.currency.as_str()),
            COLUMN_PRICE => Value::Decimal(self.price),
            COLUMN_STRIPE_PRICE_ID => Value::from(self.stripe_price_id.as_str()),
            COLUMN_FEATURES => Value::from(self.features.as_str()),
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
            COLUMN_TYPE => self.plan_type = raw.to_string(),
            COLUMN_STATUS => self.status = raw.to_string(),
            COLUMN_TITLE => self.title = raw.to_string(),
            COLUMN_DESCRIPTION => self.description = raw.to_string(),
            COLUMN_INTERVAL => self.interval = raw.to_string(),
            COLUMN_CURRENCY => self.currency = raw.to_string(),
            COLUMN_PRICE => self.price = parse_price(raw)?,
            COLUMN_STRIPE_PRICE_ID => self.stripe_price_id = raw.to_string(),
            COLUMN_FEATURES => self.features = raw.to_string(),
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

    fn touch_created(&mut self, now: DateTime<Utc>) {
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

impl HasMetas for Plan {
    fn metas_raw(&self) -> &str {
        &self.metas
    }

    fn replace_metas_raw(&mut self, raw: String) {
        self.metas = raw;
        self.changes.mark(COLUMN_METAS);
    }
}

/// Rounds to `PRICE_SCALE` places the way `NUMERIC(10,2)` does, and pads
/// the scale so `19.9` and `19.90` render alike
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// Parses a stored price; an empty value is zero
fn parse_price(raw: &str) -> Result<Decimal, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(normalize_price(Decimal::ZERO));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(normalize_price)
        .map_err(|e| CoreError::invalid_value(COLUMN_PRICE, raw, e))
}

pub(crate) fn parse_column_datetime(
    column: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, CoreError> {
    parse_datetime(raw).map_err(|e| CoreError::invalid_value(column, raw, e))
}
