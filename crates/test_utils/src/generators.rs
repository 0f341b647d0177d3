//! Property-Based Test Generators
//!
//! Proptest strategies for generating test data that fits the stored
//! column types.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain_subscription::{plan_interval, plan_status, subscription_status};
use proptest::prelude::*;
use rust_decimal::Decimal;
use subscription_kernel::Metas;

/// Strategy for plan prices that fit NUMERIC(10,2)
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for plan statuses
pub fn plan_status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(plan_status::ACTIVE.to_string()),
        Just(plan_status::INACTIVE.to_string()),
    ]
}

/// Strategy for subscription statuses
pub fn subscription_status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(subscription_status::ACTIVE.to_string()),
        Just(subscription_status::INACTIVE.to_string()),
        Just(subscription_status::CANCELLED.to_string()),
    ]
}

/// Strategy for billing intervals
pub fn interval_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(plan_interval::DAILY.to_string()),
        Just(plan_interval::WEEKLY.to_string()),
        Just(plan_interval::MONTHLY.to_string()),
        Just(plan_interval::QUARTERLY.to_string()),
        Just(plan_interval::YEARLY.to_string()),
    ]
}

/// Strategy for meta keys
pub fn meta_key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Strategy for meta maps, values may contain quotes and unicode
pub fn metas_strategy() -> impl Strategy<Value = Metas> {
    proptest::collection::btree_map(meta_key_strategy(), "\\PC{0,24}", 0..6)
}

/// Strategy for record identifiers that fit the 40 character id columns
pub fn record_id_strategy() -> impl Strategy<Value = String> {
    "[0-9A-Za-z-]{1,40}"
}

/// Strategy for whole-second instants between 2000 and 2100
pub fn datetime_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..36_500i64, 0i64..86_400i64).prop_map(|(days, seconds)| {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(days)
            + Duration::seconds(seconds)
    })
}

/// Strategy for billing periods (start before end)
pub fn period_strategy() -> impl Strategy<Value = (DateTime<Utc>, DateTime<Utc>)> {
    (datetime_strategy(), 1i64..400i64)
        .prop_map(|(start, days)| (start, start + Duration::days(days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    proptest! {
        #[test]
        fn price_fits_numeric_10_2(price in price_strategy()) {
            prop_assert!(price >= Decimal::ZERO);
            prop_assert!(price.scale() == 2);
            prop_assert!(price < Decimal::new(100_000_000, 0));
        }

        #[test]
        fn datetimes_have_whole_seconds(at in datetime_strategy()) {
            prop_assert_eq!(at.nanosecond(), 0);
        }

        #[test]
        fn periods_are_ordered((start, end) in period_strategy()) {
            prop_assert!(start < end);
        }

        #[test]
        fn record_ids_fit_id_column(id in record_id_strategy()) {
            prop_assert!(!id.is_empty() && id.len() <= 40);
        }
    }
}
