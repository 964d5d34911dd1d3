use crate::infra::AppState;
use ad_insights::error::AppError;
use ad_insights::insights::{RangeQuery, RangeReport, YearlyReport};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RangeReportParams {
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) end_date: Option<String>,
}

pub(crate) fn report_router(state: AppState) -> Router {
    Router::new()
        .route("/get_data", get(range_report_endpoint))
        .route("/get_yearly_data", get(yearly_report_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn range_report_endpoint(
    State(state): State<AppState>,
    Query(params): Query<RangeReportParams>,
) -> Result<Json<RangeReport>, AppError> {
    let RangeReportParams {
        start_date,
        end_date,
    } = params;

    let range = RangeQuery {
        start_date,
        end_date,
    }
    .resolve((state.today)())?;

    Ok(Json(state.reporter.range_report(range).await))
}

pub(crate) async fn yearly_report_endpoint(State(state): State<AppState>) -> Json<YearlyReport> {
    Json(state.reporter.yearly_report((state.today)()).await)
}
