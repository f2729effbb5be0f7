//! Handlers for the `/alerts` resource (threshold rules).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tripwire_core::error::CoreError;
use tripwire_core::types::DbId;
use tripwire_core::validation::{require_text, validate_comparator, validate_cooldown};
use tripwire_db::models::alert::{Alert, CreateAlert};
use tripwire_db::repositories::AlertRepo;

use crate::error::AppResult;
use crate::handlers::{resolve_optional, NumericInput};
use crate::middleware::json::JsonBody;
use crate::response::DataResponse;
use crate::state::AppState;

/// Raw request body for rule creation. Every field is optional here so that
/// missing fields surface as validation errors rather than body rejections.
#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    #[serde(alias = "metricName")]
    pub metric_name: Option<String>,
    pub threshold: Option<NumericInput>,
    pub comparator: Option<String>,
    pub message: Option<String>,
    #[serde(alias = "cooldownSeconds")]
    pub cooldown_seconds: Option<NumericInput>,
}

impl CreateAlertRequest {
    /// Validate into a repository input.
    pub fn validate(&self) -> Result<CreateAlert, CoreError> {
        let metric_name = require_text(self.metric_name.as_deref(), "metric_name")?;
        let threshold = resolve_optional(self.threshold.as_ref(), "threshold")?
            .ok_or_else(|| CoreError::Validation("threshold is required".to_string()))?;
        let comparator = validate_comparator(require_text(self.comparator.as_deref(), "comparator")?)?;
        let message = require_text(self.message.as_deref(), "message")?;
        let cooldown_seconds = validate_cooldown(
            resolve_optional(self.cooldown_seconds.as_ref(), "cooldown_seconds")
                .map_err(|_| {
                    CoreError::Validation("cooldown_seconds must be a non-negative number".into())
                })?,
        )?;

        Ok(CreateAlert {
            metric_name: metric_name.to_string(),
            threshold,
            comparator,
            message: message.to_string(),
            cooldown_seconds,
        })
    }
}

/// POST /api/v1/alerts
pub async fn create_alert(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateAlertRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Alert>>)> {
    let input = body.validate()?;
    let alert = AlertRepo::create(&state.pool, &input).await?;

    tracing::info!(
        alert_id = alert.id,
        metric_name = %alert.metric_name,
        comparator = %alert.comparator,
        threshold = alert.threshold,
        "Alert rule created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: alert })))
}

/// GET /api/v1/alerts
pub async fn list_alerts(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let alerts = AlertRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// DELETE /api/v1/alerts/{id}
///
/// Events the rule already produced are kept.
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AlertRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Alert", id }.into());
    }
    state.evaluator.forget_rule(id);
    tracing::info!(alert_id = id, "Alert rule deleted");
    Ok(StatusCode::NO_CONTENT)
}
