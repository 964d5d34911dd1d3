use crate::cli::ServeArgs;
use crate::infra::{build_reporter, local_today, AppState};
use crate::routes::report_router;
use ad_insights::config::AppConfig;
use ad_insights::error::AppError;
use ad_insights::telemetry;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.graph.access_token.is_none() {
        warn!("MY_ACCESS_TOKEN is not set; every configured account will report a failed fetch");
    }
    for account in &config.accounts {
        if account.account_id.is_none() {
            warn!(account = %account.name, "ad account id not set; account reports no data");
        }
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        reporter: Arc::new(build_reporter(&config)?),
        today: local_today,
    };

    let app = report_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        app_id = config.graph.app_id.as_deref().unwrap_or("unset"),
        excluded_terms = ?config.excluded_campaign_terms,
        "ad insights report service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
