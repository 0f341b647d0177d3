//! Well-known status and interval values
//!
//! Columns hold free-form strings; these are the values the store itself
//! assigns or that callers conventionally use.

pub mod plan_status {
    pub const ACTIVE: &str = "active";
    pub const INACTIVE: &str = "inactive";
}

pub mod plan_interval {
    pub const DAILY: &str = "daily";
    pub const WEEKLY: &str = "weekly";
    pub const MONTHLY: &str = "monthly";
    pub const QUARTERLY: &str = "quarterly";
    pub const YEARLY: &str = "yearly";
}

pub mod subscription_status {
    pub const ACTIVE: &str = "active";
    pub const INACTIVE: &str = "inactive";
    pub const CANCELLED: &str = "cancelled";
}
