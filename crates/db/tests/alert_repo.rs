//! Requires a PostgreSQL `DATABASE_URL`; run with `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tripwire_core::comparator::Comparator;
use tripwire_core::evaluation::{RuleStore, StoreError};
use tripwire_db::models::alert::CreateAlert;
use tripwire_db::repositories::AlertRepo;
use tripwire_db::PgRuleStore;

fn cpu_rule(threshold: f64) -> CreateAlert {
    CreateAlert {
        metric_name: "cpu".to_string(),
        threshold,
        comparator: Comparator::GreaterThan,
        message: "high cpu".to_string(),
        cooldown_seconds: 60.0,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn create_and_find(pool: PgPool) {
    let created = AlertRepo::create(&pool, &cpu_rule(90.0)).await.unwrap();
    assert_eq!(created.comparator, "GT");
    assert!(created.last_triggered.is_none());

    let found = AlertRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.metric_name, "cpu");
    assert_eq!(found.cooldown_seconds, 60.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn list_is_newest_first(pool: PgPool) {
    let first = AlertRepo::create(&pool, &cpu_rule(80.0)).await.unwrap();
    let second = AlertRepo::create(&pool, &cpu_rule(90.0)).await.unwrap();

    let ids: Vec<_> = AlertRepo::list(&pool).await.unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn unknown_comparator_violates_check(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO alerts (metric_name, threshold, comparator, message) \
         VALUES ('cpu', 1, 'NE', 'x')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn last_triggered_never_moves_backwards(pool: PgPool) {
    let rule = AlertRepo::create(&pool, &cpu_rule(90.0)).await.unwrap();
    let now = Utc::now();

    assert!(AlertRepo::update_last_triggered(&pool, rule.id, now).await.unwrap());
    assert!(AlertRepo::update_last_triggered(&pool, rule.id, now - Duration::minutes(5))
        .await
        .unwrap());

    let stored = AlertRepo::find_by_id(&pool, rule.id).await.unwrap().unwrap();
    let stored = stored.last_triggered.unwrap();
    assert!((stored - now).num_milliseconds().abs() < 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn delete_reports_whether_a_row_was_removed(pool: PgPool) {
    let rule = AlertRepo::create(&pool, &cpu_rule(90.0)).await.unwrap();

    assert!(AlertRepo::delete(&pool, rule.id).await.unwrap());
    assert!(!AlertRepo::delete(&pool, rule.id).await.unwrap());
    assert!(AlertRepo::find_by_id(&pool, rule.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// PgRuleStore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn store_returns_only_matching_rules(pool: PgPool) {
    AlertRepo::create(&pool, &cpu_rule(90.0)).await.unwrap();
    let mut mem = cpu_rule(50.0);
    mem.metric_name = "memory".to_string();
    AlertRepo::create(&pool, &mem).await.unwrap();

    let store = PgRuleStore::new(pool);
    let rules = store.find_by_metric_name("cpu").await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].comparator, Comparator::GreaterThan);
    assert!(store.find_by_metric_name("disk").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn store_update_for_missing_rule_is_not_found(pool: PgPool) {
    let store = PgRuleStore::new(pool);
    let err = store.update_last_triggered(999, Utc::now()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(999)));
}
