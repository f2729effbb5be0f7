//! Repository for the `alerts` table.

use sqlx::PgPool;
use tripwire_core::types::{DbId, Timestamp};

use crate::models::alert::{Alert, CreateAlert};

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, metric_name, threshold, comparator, message, cooldown_seconds, \
                       last_triggered, created_at, updated_at";

/// Provides CRUD operations for threshold rules.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new rule, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (metric_name, threshold, comparator, message, cooldown_seconds) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(&input.metric_name)
            .bind(input.threshold)
            .bind(input.comparator.as_tag())
            .bind(&input.message)
            .bind(input.cooldown_seconds)
            .fetch_one(pool)
            .await
    }

    /// List all rules, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Alert>(&query).fetch_all(pool).await
    }

    /// Find a rule by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rules watching `metric_name`, ordered by ID.
    pub async fn list_by_metric_name(
        pool: &PgPool,
        metric_name: &str,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE metric_name = $1 ORDER BY id");
        sqlx::query_as::<_, Alert>(&query)
            .bind(metric_name)
            .fetch_all(pool)
            .await
    }

    /// Record a trigger time. An older `triggered_at` leaves the column as is.
    ///
    /// Returns `true` if the rule exists.
    pub async fn update_last_triggered(
        pool: &PgPool,
        id: DbId,
        triggered_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts \
             SET last_triggered = GREATEST(last_triggered, $2), updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(triggered_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a rule. Its events are kept. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
