//! Query compilation tests
//!
//! These run without a database: they check the SQL text and the bound
//! parameters produced for each dialect.

use proptest::prelude::*;

use infra_db::{DatabaseError, Dialect, PlanQuery, RecordQuery, SubscriptionQuery};
use subscription_kernel::Value;

const TABLE: &str = "plan_table";

mod plan_queries {
    use super::*;

    #[test]
    fn test_default_query_only_hides_soft_deleted() {
        let statement = PlanQuery::new().compile(TABLE, Dialect::Sqlite).unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"plan_table\" WHERE \"soft_deleted_at\" > ?"
        );
        assert_eq!(statement.params().len(), 1);
        assert!(matches!(statement.params()[0], Value::DateTime(_)));
    }

    #[test]
    fn test_including_soft_deleted_drops_the_predicate() {
        let statement = PlanQuery::new()
            .with_soft_deleted_included(true)
            .compile(TABLE, Dialect::Sqlite)
            .unwrap();

        assert_eq!(statement.sql(), "SELECT * FROM \"plan_table\"");
        assert!(statement.params().is_empty());
    }

    #[test]
    fn test_filters_keep_their_order() {
        let statement = PlanQuery::new()
            .with_plan_type("pro")
            .with_status("active")
            .with_id("p1")
            .compile(TABLE, Dialect::Postgres)
            .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"plan_table\" WHERE \"id\" = $1 AND \"status\" = $2 \
             AND \"type\" = $3 AND \"soft_deleted_at\" > $4"
        );
        assert_eq!(statement.params()[0], Value::from("p1"));
        assert_eq!(statement.params()[1], Value::from("active"));
        assert_eq!(statement.params()[2], Value::from("pro"));
    }

    #[test]
    fn test_id_set_expands_placeholders() {
        let statement = PlanQuery::new()
            .with_id_in(["a", "b", "c"])
            .with_soft_deleted_included(true)
            .compile(TABLE, Dialect::Postgres)
            .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"plan_table\" WHERE \"id\" IN ($1, $2, $3)"
        );
        assert_eq!(statement.params().len(), 3);
    }

    #[test]
    fn test_pagination_and_order() {
        let statement = PlanQuery::new()
            .with_order_by("created_at")
            .with_limit(10)
            .with_offset(20)
            .with_soft_deleted_included(true)
            .compile(TABLE, Dialect::Sqlite)
            .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"plan_table\" ORDER BY \"created_at\" DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            statement.params(),
            &[Value::Integer(10), Value::Integer(20)]
        );
    }

    #[test]
    fn test_zero_limit_and_offset_are_ignored() {
        let statement = PlanQuery::new()
            .with_limit(0)
            .with_offset(0)
            .with_soft_deleted_included(true)
            .compile(TABLE, Dialect::Sqlite)
            .unwrap();

        assert_eq!(statement.sql(), "SELECT * FROM \"plan_table\"");
    }

    #[test]
    fn test_count_keeps_filters_only() {
        let query = PlanQuery::new()
            .with_status("active")
            .with_order_by("title")
            .with_limit(5);
        let statement = query.compile_count(TABLE, Dialect::Sqlite).unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT COUNT(*) AS \"count\" FROM \"plan_table\" WHERE \"status\" = ? \
             AND \"soft_deleted_at\" > ? LIMIT ?"
        );
        assert_eq!(statement.params().last(), Some(&Value::Integer(1)));
        assert!(!query.is_count_only());
    }

    #[test]
    fn test_unknown_order_column() {
        let result = PlanQuery::new()
            .with_order_by("subscriber_id")
            .compile(TABLE, Dialect::Sqlite);
        assert!(matches!(result, Err(DatabaseError::InvalidQuery(_))));
    }

    #[test]
    fn test_compile_twice_is_stable() {
        let query = PlanQuery::new()
            .with_status_in(["active", "inactive"])
            .with_order_by("price")
            .with_order_direction("asc")
            .with_soft_deleted_included(true);

        let first = query.compile(TABLE, Dialect::Postgres).unwrap();
        let second = query.compile(TABLE, Dialect::Postgres).unwrap();
        assert_eq!(first, second);
    }
}

mod subscription_queries {
    use super::*;

    #[test]
    fn test_subscriber_and_plan_filters() {
        let statement = SubscriptionQuery::new()
            .with_plan_id("plan-1")
            .with_subscriber_id("user-1")
            .with_soft_deleted_included(true)
            .compile("subscription_table", Dialect::Postgres)
            .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"subscription_table\" WHERE \"subscriber_id\" = $1 AND \"plan_id\" = $2"
        );
    }

    #[test]
    fn test_subscription_columns_are_orderable() {
        let statement = SubscriptionQuery::new()
            .with_order_by("period_end")
            .with_order_direction("asc")
            .with_soft_deleted_included(true)
            .compile("subscription_table", Dialect::Sqlite)
            .unwrap();

        assert!(statement.sql().ends_with("ORDER BY \"period_end\" ASC"));
    }

    #[test]
    fn test_plan_only_column_is_not_orderable() {
        let result = SubscriptionQuery::new()
            .with_order_by("price")
            .compile("subscription_table", Dialect::Sqlite);
        assert!(matches!(result, Err(DatabaseError::InvalidQuery(_))));
    }
}

fn placeholder_count(sql: &str, dialect: Dialect) -> usize {
    match dialect {
        Dialect::Sqlite => sql.matches('?').count(),
        Dialect::Postgres => sql.matches('$').count(),
    }
}

fn dialect_strategy() -> impl Strategy<Value = Dialect> {
    prop_oneof![Just(Dialect::Sqlite), Just(Dialect::Postgres)]
}

proptest! {
    #[test]
    fn placeholders_match_params(
        dialect in dialect_strategy(),
        id in proptest::option::of("[a-z0-9]{1,8}"),
        ids in proptest::option::of(proptest::collection::vec("[a-z0-9]{1,8}", 0..5)),
        status in proptest::option::of("active|inactive"),
        plan_type in proptest::option::of("[a-z]{1,6}"),
        limit in 0u64..50,
        offset in 0u64..50,
        count_only in any::<bool>(),
        include_deleted in any::<bool>(),
    ) {
        let mut query = PlanQuery::new()
            .with_limit(limit)
            .with_offset(offset)
            .with_count_only(count_only)
            .with_soft_deleted_included(include_deleted);
        if let Some(id) = id {
            query = query.with_id(id);
        }
        if let Some(ids) = ids {
            query = query.with_id_in(ids);
        }
        if let Some(status) = status {
            query = query.with_status(status);
        }
        if let Some(plan_type) = plan_type {
            query = query.with_plan_type(plan_type);
        }

        let statement = query.compile(TABLE, dialect).unwrap();
        prop_assert_eq!(
            placeholder_count(statement.sql(), dialect),
            statement.params().len()
        );
        prop_assert_eq!(
            statement.sql().contains("soft_deleted_at"),
            !include_deleted
        );
        if count_only {
            prop_assert!(!statement.sql().contains("OFFSET"));
            prop_assert!(statement.sql().starts_with("SELECT COUNT(*)"));
        }
    }
}
