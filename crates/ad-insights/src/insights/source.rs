use super::domain::{DateRange, Granularity, RawInsightRecord};
use crate::config::AdAccountConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("no access token configured for the Graph API")]
    MissingCredentials,
    #[error("insights request failed: {0}")]
    Request(String),
    #[error("insights request timed out")]
    Timeout,
    #[error("Graph API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected insights payload: {0}")]
    Decode(String),
    #[error("insights pagination exceeded {0} pages")]
    PageLimit(usize),
}

/// Boundary to the ads data source: one call per account, range and granularity.
#[async_trait]
pub trait InsightSource: Debug + Send + Sync {
    async fn fetch_insights(
        &self,
        account_id: &str,
        range: DateRange,
        granularity: Granularity,
    ) -> Result<Vec<RawInsightRecord>, FetchError>;
}

/// Result of fetching one account, keeping "not configured" and "failed" apart from "no rows".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(Vec<RawInsightRecord>),
    NotConfigured,
    Failed(FetchError),
}

impl FetchOutcome {
    /// Records to aggregate; empty unless the fetch succeeded.
    pub fn records(&self) -> &[RawInsightRecord] {
        match self {
            Self::Fetched(records) => records,
            Self::NotConfigured | Self::Failed(_) => &[],
        }
    }

    pub fn status(&self) -> SourceStatus {
        match self {
            Self::Fetched(_) => SourceStatus::Ok,
            Self::NotConfigured => SourceStatus::NotConfigured,
            Self::Failed(_) => SourceStatus::Failed,
        }
    }

    pub fn view(&self) -> SourceView {
        SourceView {
            status: self.status(),
            error: match self {
                Self::Failed(err) => Some(err.to_string()),
                Self::Fetched(_) | Self::NotConfigured => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    NotConfigured,
    Failed,
}

impl SourceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotConfigured => "not configured",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    pub status: SourceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Calls the data source at most once per invocation and never propagates its failures.
#[derive(Debug, Clone)]
pub struct InsightFetcher {
    source: Arc<dyn InsightSource>,
}

impl InsightFetcher {
    pub fn new(source: Arc<dyn InsightSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(
        &self,
        account: &AdAccountConfig,
        range: DateRange,
        granularity: Granularity,
    ) -> FetchOutcome {
        let Some(account_id) = account
            .account_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            debug!(account = %account.name, "ad account not configured; skipping fetch");
            return FetchOutcome::NotConfigured;
        };

        match self
            .source
            .fetch_insights(account_id, range, granularity)
            .await
        {
            Ok(records) => {
                debug!(
                    account = %account.name,
                    %range,
                    rows = records.len(),
                    "fetched insights"
                );
                FetchOutcome::Fetched(records)
            }
            Err(err) => {
                warn!(
                    account = %account.name,
                    account_id,
                    %range,
                    %err,
                    "insights fetch failed; reporting account without data"
                );
                FetchOutcome::Failed(err)
            }
        }
    }
}
