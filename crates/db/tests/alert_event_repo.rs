//! Requires a PostgreSQL `DATABASE_URL`; run with `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tripwire_core::alert::NewAlertEvent;
use tripwire_core::evaluation::EventLog;
use tripwire_core::types::Timestamp;
use tripwire_db::models::alert_event::AlertEventFilter;
use tripwire_db::repositories::{AlertEventRepo, AlertRepo};
use tripwire_db::PgEventLog;

fn breach(alert_id: i64, metric_name: &str, timestamp: Timestamp) -> NewAlertEvent {
    NewAlertEvent {
        alert_id,
        metric_name: metric_name.to_string(),
        metric_value: 95.0,
        timestamp,
        message: format!("{metric_name} breached"),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn list_filters_and_orders_newest_first(pool: PgPool) {
    let base = Utc::now();
    for minutes in 0..3 {
        AlertEventRepo::insert(&pool, &breach(1, "cpu", base + Duration::minutes(minutes)))
            .await
            .unwrap();
    }
    AlertEventRepo::insert(&pool, &breach(2, "memory", base)).await.unwrap();

    let filter = AlertEventFilter {
        metric_name: Some("cpu".to_string()),
        ..Default::default()
    };
    let events = AlertEventRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert_eq!(events.len(), 3);
    assert!(events.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(AlertEventRepo::count(&pool, &filter).await.unwrap(), 3);
    assert_eq!(AlertEventRepo::count(&pool, &AlertEventFilter::default()).await.unwrap(), 4);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn time_bounds_are_inclusive(pool: PgPool) {
    let base = Utc::now();
    for minutes in 0..5 {
        AlertEventRepo::insert(&pool, &breach(1, "cpu", base + Duration::minutes(minutes)))
            .await
            .unwrap();
    }

    let filter = AlertEventFilter {
        metric_name: None,
        start: Some(base + Duration::minutes(1)),
        end: Some(base + Duration::minutes(3)),
    };
    assert_eq!(AlertEventRepo::count(&pool, &filter).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn limit_and_offset_page_through_results(pool: PgPool) {
    let base = Utc::now();
    for minutes in 0..5 {
        AlertEventRepo::insert(&pool, &breach(1, "cpu", base + Duration::minutes(minutes)))
            .await
            .unwrap();
    }

    let filter = AlertEventFilter::default();
    let page_two = AlertEventRepo::list(&pool, &filter, 2, 2).await.unwrap();
    assert_eq!(page_two.len(), 2);
    assert!(page_two[0].timestamp < base + Duration::minutes(3));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn events_outlive_their_rule(pool: PgPool) {
    let rule = AlertRepo::create(
        &pool,
        &tripwire_db::models::alert::CreateAlert {
            metric_name: "cpu".to_string(),
            threshold: 90.0,
            comparator: tripwire_core::comparator::Comparator::GreaterThan,
            message: "high cpu".to_string(),
            cooldown_seconds: 0.0,
        },
    )
    .await
    .unwrap();

    let log = PgEventLog::new(pool.clone());
    let stored = log.append(breach(rule.id, "cpu", Utc::now())).await.unwrap();
    assert_eq!(stored.alert_id, rule.id);

    AlertRepo::delete(&pool, rule.id).await.unwrap();
    assert_eq!(AlertEventRepo::count(&pool, &AlertEventFilter::default()).await.unwrap(), 1);
}
