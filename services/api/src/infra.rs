use ad_insights::config::AppConfig;
use ad_insights::error::AppError;
use ad_insights::insights::{self, GraphInsightsClient, InsightReporter};
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) reporter: Arc<InsightReporter>,
    pub(crate) today: fn() -> NaiveDate,
}

pub(crate) fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Wires the Graph API client and the configured accounts into a reporter.
pub(crate) fn build_reporter(config: &AppConfig) -> Result<InsightReporter, AppError> {
    let client = GraphInsightsClient::new(config.graph.clone())?;
    Ok(InsightReporter::from_config(config, Arc::new(client)))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    insights::domain::parse_date(raw).map_err(|err| err.to_string())
}
