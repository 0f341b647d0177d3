//! Plan entity tests
//!
//! Covers construction defaults, change tracking through typed setters and the
//! string-keyed record view, hydration from stored rows, and meta handling.

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use domain_subscription::{plan_interval, plan_status, Plan};
use subscription_kernel::temporal::MAX_DATETIME;
use subscription_kernel::{CoreError, FieldMap, HasMetas, Record};

fn stored_row() -> FieldMap {
    [
        ("id", "20240601083000000000000123"),
        ("type", "standard"),
        ("status", "active"),
        ("title", "Pro"),
        ("interval", "monthly"),
        ("currency", "usd"),
        ("price", "19.99"),
        ("metas", r#"{"tier":"gold"}"#),
        ("created_at", "2024-06-01 08:30:00"),
        ("updated_at", "2024-06-02T09:00:00Z"),
        ("soft_deleted_at", MAX_DATETIME),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

mod construction {
    use super::*;

    #[test]
    fn test_new_plan_defaults() {
        let plan = Plan::new();

        assert_eq!(plan.id().len(), 26);
        assert_eq!(plan.status(), plan_status::INACTIVE);
        assert_eq!(plan.metas_raw(), "{}");
        assert_eq!(plan.get("soft_deleted_at").as_deref(), Some(MAX_DATETIME));
        assert_eq!(plan.created_at(), plan.updated_at());
        assert!(!plan.is_soft_deleted());
    }

    #[test]
    fn test_new_plan_reports_constructor_columns_as_changed() {
        let plan = Plan::new();
        let changed = plan.data_changed();

        for column in [
            "id",
            "status",
            "stripe_price_id",
            "description",
            "features",
            "memo",
            "metas",
            "soft_deleted_at",
            "created_at",
            "updated_at",
        ] {
            assert!(changed.contains_key(column), "{column} should be changed");
        }
        assert!(!changed.contains_key("title"));
        assert!(!changed.contains_key("price"));
    }

    #[test]
    fn test_new_plans_have_distinct_ids() {
        assert_ne!(Plan::new().id(), Plan::new().id());
    }
}

mod change_tracking {
    use super::*;

    #[test]
    fn test_mark_clean_is_idempotent() {
        let mut plan = Plan::new();
        plan.mark_clean();
        assert!(plan.data_changed().is_empty());
        plan.mark_clean();
        assert!(plan.data_changed().is_empty());
        assert!(!plan.is_dirty());
    }

    #[test]
    fn test_typed_setters_mark_columns() {
        let mut plan = Plan::new();
        plan.mark_clean();

        plan.set_title("Pro")
            .set_interval(plan_interval::YEARLY)
            .set_price(dec!(199.00));

        let changed = plan.data_changed();
        assert_eq!(changed.len(), 3);
        assert_eq!(changed.get("title").map(String::as_str), Some("Pro"));
        assert_eq!(changed.get("interval").map(String::as_str), Some("yearly"));
        assert_eq!(changed.get("price").map(String::as_str), Some("199.00"));
    }

    #[test]
    fn test_string_set_parses_and_marks() {
        let mut plan = Plan::new();
        plan.mark_clean();

        plan.set("price", "19.99").unwrap().set("type", "addon").unwrap();

        assert_eq!(plan.price(), dec!(19.99));
        assert_eq!(plan.plan_type(), "addon");
        assert_eq!(plan.data_changed().len(), 2);
    }

    #[test]
    fn test_price_is_kept_to_two_places() {
        let mut plan = Plan::new();

        plan.set_price(dec!(19.999));
        assert_eq!(plan.get("price").as_deref(), Some("20.00"));

        plan.set_price(dec!(19.9));
        assert_eq!(plan.get("price").as_deref(), Some("19.90"));

        plan.set("price", "0.125").unwrap();
        assert_eq!(plan.price(), dec!(0.13));
        plan.set("price", "-0.125").unwrap();
        assert_eq!(plan.price(), dec!(-0.13));
    }

    #[test]
    fn test_set_id_is_rejected() {
        let mut plan = Plan::new();
        let result = plan.set("id", "other");
        assert!(matches!(result, Err(CoreError::ImmutableField(_))));
    }

    #[test]
    fn test_set_unknown_column_is_rejected() {
        let mut plan = Plan::new();
        let result = plan.set("subscriber_id", "x");
        assert!(matches!(result, Err(CoreError::UnknownField { .. })));
    }

    #[test]
    fn test_set_invalid_price_is_rejected() {
        let mut plan = Plan::new();
        plan.mark_clean();
        let result = plan.set("price", "nineteen");
        assert!(matches!(result, Err(CoreError::InvalidValue { .. })));
        assert!(!plan.is_dirty());
    }

    #[test]
    fn test_set_invalid_datetime_is_rejected() {
        let mut plan = Plan::new();
        let result = plan.set("created_at", "yesterday");
        assert!(matches!(result, Err(CoreError::InvalidValue { .. })));
    }
}

mod hydration {
    use super::*;

    #[test]
    fn test_from_fields_starts_clean() {
        let plan = Plan::from_fields(&stored_row()).unwrap();

        assert!(!plan.is_dirty());
        assert_eq!(plan.id(), "20240601083000000000000123");
        assert_eq!(plan.title(), "Pro");
        assert_eq!(plan.price(), dec!(19.99));
        assert_eq!(plan.price_float(), 19.99);
        assert_eq!(
            plan.created_at(),
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
        );
        assert_eq!(
            plan.updated_at(),
            Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_from_fields_ignores_unknown_keys() {
        let mut row = stored_row();
        row.insert("count".to_string(), "3".to_string());
        assert!(Plan::from_fields(&row).is_ok());
    }

    #[test]
    fn test_from_fields_accepts_scientific_price() {
        let mut row = stored_row();
        row.insert("price".to_string(), "1.999e1".to_string());
        let plan = Plan::from_fields(&row).unwrap();
        assert_eq!(plan.price(), dec!(19.99));
    }

    #[test]
    fn test_data_uses_portable_forms() {
        let plan = Plan::from_fields(&stored_row()).unwrap();
        let data = plan.data();

        assert_eq!(data.get("created_at").map(String::as_str), Some("2024-06-01 08:30:00"));
        assert_eq!(data.get("updated_at").map(String::as_str), Some("2024-06-02 09:00:00"));
        assert_eq!(data.len(), Plan::COLUMNS.len());
    }

    #[test]
    fn test_soft_deleted_in_the_past() {
        let mut row = stored_row();
        row.insert("soft_deleted_at".to_string(), "2020-01-01 00:00:00".to_string());
        let plan = Plan::from_fields(&row).unwrap();
        assert!(plan.is_soft_deleted());
    }
}

mod metas {
    use super::*;

    #[test]
    fn test_meta_round_trip_marks_metas() {
        let mut plan = Plan::from_fields(&stored_row()).unwrap();

        assert_eq!(plan.meta("tier").unwrap().as_deref(), Some("gold"));

        plan.set_meta("seats", "10").unwrap();
        assert_eq!(plan.meta("seats").unwrap().as_deref(), Some("10"));
        assert!(plan.changes().contains("metas"));

        plan.delete_meta("tier").unwrap();
        assert!(!plan.has_meta("tier").unwrap());
    }

    #[test]
    fn test_malformed_metas_surface_as_error() {
        let mut row = stored_row();
        row.insert("metas".to_string(), "{broken".to_string());
        let plan = Plan::from_fields(&row).unwrap();

        let err = plan.metas().unwrap_err();
        assert!(err.is_serialization());
    }
}
