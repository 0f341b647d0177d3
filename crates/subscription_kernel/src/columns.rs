//! Column names shared by the plan and subscription tables

pub const COLUMN_ID: &str = "id";
pub const COLUMN_STATUS: &str = "status";
pub const COLUMN_MEMO: &str = "memo";
pub const COLUMN_METAS: &str = "metas";
pub const COLUMN_CREATED_AT: &str = "created_at";
pub const COLUMN_UPDATED_AT: &str = "updated_at";
pub const COLUMN_SOFT_DELETED_AT: &str = "soft_deleted_at";

// Plan
pub const COLUMN_TYPE: &str = "type";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_DESCRIPTION: &str = "description";
pub const COLUMN_INTERVAL: &str = "interval";
pub const COLUMN_CURRENCY: &str = "currency";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_STRIPE_PRICE_ID: &str = "stripe_price_id";
pub const COLUMN_FEATURES: &str = "features";

// Subscription
pub const COLUMN_SUBSCRIBER_ID: &str = "subscriber_id";
pub const COLUMN_PLAN_ID: &str = "plan_id";
pub const COLUMN_PERIOD_START: &str = "period_start";
pub const COLUMN_PERIOD_END: &str = "period_end";
pub const COLUMN_CANCEL_AT_PERIOD_END: &str = "cancel_at_period_end";
pub const COLUMN_PAYMENT_METHOD_ID: &str = "payment_method_id";

/// Stored form of a true boolean flag
pub const YES: &str = "yes";
/// Stored form of a false boolean flag
pub const NO: &str = "no";
