//! Repository for the `alert_events` table.

use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{PgPool, Postgres};
use tripwire_core::alert::NewAlertEvent;

use crate::models::alert_event::{AlertEvent, AlertEventFilter};

/// Column list for `alert_events` queries.
const COLUMNS: &str = "id, alert_id, metric_name, metric_value, timestamp, message, created_at";

/// Provides append and read operations for breach events.
pub struct AlertEventRepo;

impl AlertEventRepo {
    /// Insert a new event, returning the stored row.
    pub async fn insert(pool: &PgPool, event: &NewAlertEvent) -> Result<AlertEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_events (alert_id, metric_name, metric_value, timestamp, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertEvent>(&query)
            .bind(event.alert_id)
            .bind(&event.metric_name)
            .bind(event.metric_value)
            .bind(event.timestamp)
            .bind(&event.message)
            .fetch_one(pool)
            .await
    }

    /// List events matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &AlertEventFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertEvent>, sqlx::Error> {
        let (where_clause, next_idx) = where_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM alert_events {where_clause} \
             ORDER BY timestamp DESC, id DESC \
             LIMIT ${next_idx} OFFSET ${offset_idx}",
            offset_idx = next_idx + 1,
        );

        let q = bind_filter_as(sqlx::query_as::<_, AlertEvent>(&query), filter);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count events matching `filter`.
    pub async fn count(pool: &PgPool, filter: &AlertEventFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = where_clause(filter);
        let query = format!("SELECT COUNT(*) FROM alert_events {where_clause}");

        bind_filter_scalar(sqlx::query_scalar::<_, i64>(&query), filter)
            .fetch_one(pool)
            .await
    }
}

/// Build the WHERE clause for `filter` and return the next free bind index.
fn where_clause(filter: &AlertEventFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.metric_name.is_some() {
        conditions.push(format!("metric_name = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.start.is_some() {
        conditions.push(format!("timestamp >= ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.end.is_some() {
        conditions.push(format!("timestamp <= ${bind_idx}"));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

// Parameters are bound in the same order `where_clause` numbers them.

fn bind_filter_as<'q>(
    mut q: QueryAs<'q, Postgres, AlertEvent, PgArguments>,
    filter: &'q AlertEventFilter,
) -> QueryAs<'q, Postgres, AlertEvent, PgArguments> {
    if let Some(ref name) = filter.metric_name {
        q = q.bind(name);
    }
    if let Some(start) = filter.start {
        q = q.bind(start);
    }
    if let Some(end) = filter.end {
        q = q.bind(end);
    }
    q
}

fn bind_filter_scalar<'q>(
    mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    filter: &'q AlertEventFilter,
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    if let Some(ref name) = filter.metric_name {
        q = q.bind(name);
    }
    if let Some(start) = filter.start {
        q = q.bind(start);
    }
    if let Some(end) = filter.end {
        q = q.bind(end);
    }
    q
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, next) = where_clause(&AlertEventFilter::default());
        assert_eq!(clause, "");
        assert_eq!(next, 1);
    }

    #[test]
    fn filters_are_numbered_in_bind_order() {
        let filter = AlertEventFilter {
            metric_name: Some("cpu".to_string()),
            start: None,
            end: Some(Utc::now()),
        };
        let (clause, next) = where_clause(&filter);
        assert_eq!(clause, "WHERE metric_name = $1 AND timestamp <= $2");
        assert_eq!(next, 3);
    }
}
