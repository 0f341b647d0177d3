//! PostgreSQL integration tests
//!
//! These start a PostgreSQL container through testcontainers and are ignored
//! by default. Run them with `cargo test -p infra_db -- --ignored` on a
//! machine with Docker.

use rust_decimal_macros::dec;

use infra_db::{Dialect, PlanQuery, SubscriptionQuery};
use subscription_kernel::{max_datetime, HasMetas, Record};
use test_utils::{
    assert_same_second, get_shared_test_database, PlanFixtures, TestPlanBuilder,
    TestSubscriptionBuilder,
};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_plan_round_trip_on_postgres() {
    let test_db = get_shared_test_database().await;
    let store = test_db.store().await.unwrap();
    assert_eq!(store.dialect(), Dialect::Postgres);

    let mut plan = TestPlanBuilder::new()
        .with_title("Postgres")
        .with_price(dec!(19.99))
        .with_meta("region", "eu")
        .build();
    store.plans().create(&mut plan).await.unwrap();

    let found = store.plans().find_by_id(plan.id()).await.unwrap().unwrap();
    assert_eq!(found.title(), "Postgres");
    assert_eq!(found.price(), dec!(19.99));
    assert_eq!(found.meta("region").unwrap().as_deref(), Some("eu"));
    assert_same_second(found.created_at(), plan.created_at());
    store.close().await;
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_soft_delete_and_count_on_postgres() {
    let test_db = get_shared_test_database().await;
    let store = test_db.store().await.unwrap();

    let mut plan = PlanFixtures::pro_yearly();
    store.plans().create(&mut plan).await.unwrap();
    let by_id = PlanQuery::new().with_id(plan.id());
    assert_eq!(store.plans().count(&by_id).await.unwrap(), 1);

    let deleted = store.plans().soft_delete_by_id(plan.id()).await.unwrap();
    assert!(deleted.is_soft_deleted());

    assert_eq!(store.plans().count(&by_id).await.unwrap(), 0);
    let with_deleted = by_id.with_soft_deleted_included(true);
    assert_eq!(store.plans().count(&with_deleted).await.unwrap(), 1);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_subscription_defaults_on_postgres() {
    let test_db = get_shared_test_database().await;
    let store = test_db.store().await.unwrap();

    let mut subscription = TestSubscriptionBuilder::new()
        .with_subscriber_id("pg-user")
        .with_plan_id("pg-plan")
        .without_period()
        .build();
    store.subscriptions().create(&mut subscription).await.unwrap();

    let query = SubscriptionQuery::new().with_subscriber_id("pg-user");
    let found = store.subscriptions().list(&query).await.unwrap();
    assert_eq!(found.len(), 1);

    let stored = &found[0];
    assert_same_second(stored.period_start().unwrap(), stored.created_at());
    assert_eq!(stored.period_end(), Some(max_datetime()));
    store.close().await;
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_rolled_back_create_on_postgres() {
    let test_db = get_shared_test_database().await;
    let store = test_db.store().await.unwrap();
    let mut plan = TestPlanBuilder::new().with_price(dec!(19.999)).build();

    let tx = store.begin().await.unwrap();
    store.plans().create_in(tx.as_executor(), &mut plan).await.unwrap();
    let pending = store
        .plans()
        .find_by_id_in(tx.as_executor(), plan.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pending.price(), dec!(20.00));
    tx.rollback().await.unwrap();

    assert!(!store.plans().exists(plan.id()).await.unwrap());
    store.close().await;
}
