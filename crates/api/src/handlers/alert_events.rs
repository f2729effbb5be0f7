//! Handler for the `/alert-events` history listing.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tripwire_core::alert::AlertEvent;
use tripwire_core::error::CoreError;
use tripwire_core::pagination::PageRequest;
use tripwire_core::sample::parse_timestamp;
use tripwire_core::types::Timestamp;
use tripwire_db::models::alert_event::AlertEventFilter;
use tripwire_db::repositories::AlertEventRepo;

use crate::error::AppResult;
use crate::response::PageResponse;
use crate::state::AppState;

/// Query parameters for `GET /alert-events`.
///
/// `page` and `limit` are taken as text; values that are not integers fall
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct AlertEventQuery {
    #[serde(alias = "metricName")]
    pub metric_name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl AlertEventQuery {
    /// Resolve into a repository filter and a clamped page request.
    pub fn resolve(&self) -> Result<(AlertEventFilter, PageRequest), CoreError> {
        let metric_name = self
            .metric_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let filter = AlertEventFilter {
            metric_name,
            start: bound(self.start.as_deref(), "start")?,
            end: bound(self.end.as_deref(), "end")?,
        };
        let page = PageRequest::new(
            lenient_int(self.page.as_deref()),
            lenient_int(self.limit.as_deref()),
        );
        Ok((filter, page))
    }
}

fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn bound(raw: Option<&str>, name: &str) -> Result<Option<Timestamp>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("{name} must be a valid timestamp"))),
    }
}

/// GET /api/v1/alert-events
pub async fn list_alert_events(
    State(state): State<AppState>,
    Query(params): Query<AlertEventQuery>,
) -> AppResult<Json<PageResponse<AlertEvent>>> {
    let (filter, page) = params.resolve()?;

    let total = AlertEventRepo::count(&state.pool, &filter).await?;
    let rows = AlertEventRepo::list(&state.pool, &filter, page.limit, page.offset()).await?;

    Ok(Json(PageResponse {
        meta: page.meta(total),
        data: rows.into_iter().map(AlertEvent::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamps_apply() {
        let query = AlertEventQuery {
            page: Some("0".into()),
            limit: Some("500".into()),
            ..Default::default()
        };
        let (filter, page) = query.resolve().unwrap();
        assert!(filter.metric_name.is_none());
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn non_numeric_page_and_limit_use_defaults() {
        let query = AlertEventQuery {
            page: Some("two".into()),
            limit: Some("".into()),
            ..Default::default()
        };
        let (_, page) = query.resolve().unwrap();
        assert_eq!(page, PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn padded_numbers_are_accepted() {
        let query = AlertEventQuery {
            page: Some(" 3 ".into()),
            limit: Some("-5".into()),
            ..Default::default()
        };
        let (_, page) = query.resolve().unwrap();
        assert_eq!(page, PageRequest { page: 3, limit: 1 });
    }

    #[test]
    fn time_bounds_are_parsed() {
        let query = AlertEventQuery {
            metric_name: Some("cpu".into()),
            start: Some("2024-05-01".into()),
            end: Some("2024-05-02T00:00:00Z".into()),
            ..Default::default()
        };
        let (filter, _) = query.resolve().unwrap();
        assert_eq!(filter.metric_name.as_deref(), Some("cpu"));
        assert!(filter.start.unwrap() < filter.end.unwrap());
    }

    #[test]
    fn unparseable_bound_is_rejected() {
        let query = AlertEventQuery {
            end: Some("tomorrow".into()),
            ..Default::default()
        };
        let err = query.resolve().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: end must be a valid timestamp");
    }
}
