//! Subscription entity tests

use chrono::{Duration, TimeZone, Utc};

use domain_subscription::{subscription_status, Subscription};
use subscription_kernel::{max_datetime, CoreError, FieldMap, HasMetas, Record};

fn row(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

mod construction {
    use super::*;

    #[test]
    fn test_new_subscription_defaults() {
        let subscription = Subscription::new();

        assert_eq!(subscription.status(), subscription_status::INACTIVE);
        assert!(!subscription.cancel_at_period_end());
        assert_eq!(subscription.get("cancel_at_period_end").as_deref(), Some("no"));
        assert!(subscription.period_start().is_none());
        assert!(subscription.period_end().is_none());
        assert_eq!(subscription.soft_deleted_at(), max_datetime());
    }

    #[test]
    fn test_unset_periods_are_omitted_from_data() {
        let subscription = Subscription::new();
        let data = subscription.data();

        assert!(!data.contains_key("period_start"));
        assert!(!data.contains_key("period_end"));
        assert!(subscription.data_changed().contains_key("cancel_at_period_end"));
    }
}

mod lifecycle_hooks {
    use super::*;

    #[test]
    fn test_touch_created_defaults_periods() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut subscription = Subscription::new();
        subscription.mark_clean();

        subscription.touch_created(now);

        assert_eq!(subscription.period_start(), Some(now));
        assert_eq!(subscription.period_end(), Some(max_datetime()));
        assert_eq!(subscription.created_at(), now);
        assert!(subscription.changes().contains("period_start"));
        assert!(subscription.changes().contains("period_end"));
    }

    #[test]
    fn test_touch_created_keeps_explicit_periods() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let start = now - Duration::days(3);
        let end = now + Duration::days(27);

        let mut subscription = Subscription::new();
        subscription.set_period_start(start).set_period_end(end);
        subscription.touch_created(now);

        assert_eq!(subscription.period_start(), Some(start));
        assert_eq!(subscription.period_end(), Some(end));
        assert!(subscription.is_in_period(now));
        assert!(!subscription.is_in_period(end + Duration::seconds(1)));
    }

    #[test]
    fn test_mark_soft_deleted() {
        let mut subscription = Subscription::new();
        subscription.mark_soft_deleted(Utc::now() - Duration::seconds(5));
        assert!(subscription.is_soft_deleted());
    }
}

mod string_view {
    use super::*;

    #[test]
    fn test_cancel_flag_parsing() {
        let mut subscription = Subscription::new();

        subscription.set("cancel_at_period_end", "YES").unwrap();
        assert!(subscription.cancel_at_period_end());

        subscription.set("cancel_at_period_end", "no").unwrap();
        assert!(!subscription.cancel_at_period_end());

        let result = subscription.set("cancel_at_period_end", "maybe");
        assert!(matches!(result, Err(CoreError::InvalidValue { .. })));
    }

    #[test]
    fn test_hydration_of_periods() {
        let subscription = Subscription::from_fields(&row(&[
            ("id", "20240601120000000000000001"),
            ("subscriber_id", "user-1"),
            ("plan_id", "plan-1"),
            ("period_start", "2024-06-01 12:00:00"),
            ("period_end", ""),
            ("cancel_at_period_end", "yes"),
        ]))
        .unwrap();

        assert!(!subscription.is_dirty());
        assert_eq!(subscription.subscriber_id(), "user-1");
        assert_eq!(
            subscription.period_start(),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(subscription.period_end(), None);
        assert!(subscription.cancel_at_period_end());
    }

    #[test]
    fn test_plan_columns_are_unknown() {
        let mut subscription = Subscription::new();
        let result = subscription.set("price", "1.00");
        assert!(matches!(result, Err(CoreError::UnknownField { entity: "subscription", .. })));
    }
}

mod metas {
    use super::*;

    #[test]
    fn test_set_get_delete_meta() {
        let mut subscription = Subscription::new();
        subscription.mark_clean();

        subscription
            .set_meta("source", "checkout")
            .unwrap()
            .set_meta("coupon", "SPRING")
            .unwrap();

        assert_eq!(subscription.meta("source").unwrap().as_deref(), Some("checkout"));
        assert!(subscription.has_meta("coupon").unwrap());
        assert_eq!(
            subscription.metas_raw(),
            r#"{"coupon":"SPRING","source":"checkout"}"#
        );
        let changed = subscription.data_changed();
        assert_eq!(changed.len(), 1);
        assert!(changed.contains_key("metas"));

        subscription.mark_clean();
        subscription.delete_meta("coupon").unwrap();

        assert!(!subscription.has_meta("coupon").unwrap());
        assert_eq!(subscription.meta("coupon").unwrap(), None);
        assert!(subscription.data_changed().contains_key("metas"));
    }

    #[test]
    fn test_malformed_metas_are_an_error() {
        let subscription = Subscription::from_fields(&row(&[
            ("id", "s1"),
            ("metas", "{not json"),
        ]))
        .unwrap();

        assert!(matches!(
            subscription.meta("source"),
            Err(CoreError::Serialization(_))
        ));
    }
}
