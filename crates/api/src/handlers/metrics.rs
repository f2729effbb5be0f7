//! Handler for metric ingestion.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tripwire_core::error::CoreError;
use tripwire_core::evaluation::EvaluationReport;
use tripwire_core::sample::{parse_optional_timestamp, MetricSample};
use tripwire_core::validation::require_text;

use crate::error::{AppError, AppResult};
use crate::handlers::{resolve_optional, NumericInput};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::JsonBody;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Raw sample as posted by a collector.
#[derive(Debug, Deserialize)]
pub struct MetricRequest {
    #[serde(alias = "metricName")]
    pub metric_name: Option<String>,
    pub value: Option<NumericInput>,
    /// Observation time. Non-string or unparseable values are ignored.
    pub timestamp: Option<serde_json::Value>,
}

impl MetricRequest {
    pub fn validate(&self) -> Result<MetricSample, CoreError> {
        let metric_name = require_text(self.metric_name.as_deref(), "metric_name")?;
        let value = resolve_optional(self.value.as_ref(), "value")?
            .ok_or_else(|| CoreError::Validation("value is required".to_string()))?;

        let raw_timestamp = match &self.timestamp {
            Some(serde_json::Value::String(s)) => Some(s.as_str()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => {
                tracing::warn!(timestamp = %other, "Ignoring non-string sample timestamp");
                None
            }
        };

        let mut sample = MetricSample::new(metric_name, value);
        sample.timestamp = parse_optional_timestamp(raw_timestamp);
        Ok(sample)
    }
}

/// Counts returned to the collector for one sample.
#[derive(Debug, Serialize)]
pub struct MetricResult {
    pub rules_matched: usize,
    pub events_triggered: usize,
    pub suppressed: usize,
    pub failed: usize,
}

impl From<&EvaluationReport> for MetricResult {
    fn from(report: &EvaluationReport) -> Self {
        Self {
            rules_matched: report.rules_matched(),
            events_triggered: report.triggered(),
            suppressed: report.suppressed(),
            failed: report.failed(),
        }
    }
}

/// POST /api/v1/metrics
///
/// Evaluation runs on its own task so that a dropped request (timeout or
/// client disconnect) cannot abandon rule processing halfway.
pub async fn ingest_metric(
    caller: AuthUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<MetricRequest>,
) -> AppResult<Json<MessageResponse<MetricResult>>> {
    let sample = body.validate()?;
    tracing::debug!(
        subject = %caller.subject,
        metric_name = %sample.metric_name,
        value = sample.value,
        "Metric received"
    );

    let evaluator = Arc::clone(&state.evaluator);
    let report = tokio::spawn(async move { evaluator.evaluate(&sample).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Evaluation task failed: {e}")))??;

    Ok(Json(MessageResponse {
        message: "Metric processed",
        data: MetricResult::from(&report),
    }))
}
