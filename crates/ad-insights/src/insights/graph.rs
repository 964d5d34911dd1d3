//! Meta Graph API insights client.
//!
//! Requests campaign-level insights with the lead action breakdown and follows
//! cursor pagination until the last page.

use super::domain::{DateRange, Granularity, RawInsightRecord};
use super::source::{FetchError, InsightSource};
use crate::config::GraphApiConfig;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, instrument};

const INSIGHT_FIELDS: &str = "campaign_name,spend,actions";

#[derive(Debug, Deserialize)]
struct InsightsPage {
    #[serde(default)]
    data: Vec<RawInsightRecord>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

/// Insights client for the Graph API. Credentials are redacted from `Debug`.
#[derive(Debug, Clone)]
pub struct GraphInsightsClient {
    client: Client,
    config: GraphApiConfig,
}

impl GraphInsightsClient {
    pub fn new(config: GraphApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FetchError::Request(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn insights_url(&self, account_id: &str) -> String {
        format!(
            "{}/{}/{}/insights",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_version.trim_matches('/'),
            normalize_account_id(account_id)
        )
    }

    fn first_page_query(
        &self,
        token: &SecretString,
        range: DateRange,
        granularity: Granularity,
    ) -> Vec<(&'static str, String)> {
        let time_range = serde_json::json!({
            "since": range.since().format("%Y-%m-%d").to_string(),
            "until": range.until().format("%Y-%m-%d").to_string(),
        })
        .to_string();

        let mut query = vec![
            ("level", "campaign".to_string()),
            ("time_range", time_range),
            ("time_increment", granularity.time_increment().to_string()),
            ("fields", INSIGHT_FIELDS.to_string()),
            ("action_breakdowns", "action_type".to_string()),
            ("access_token", token.expose_secret().to_string()),
        ];
        if let Some(proof) = self
            .config
            .app_secret
            .as_ref()
            .and_then(|secret| appsecret_proof(secret, token))
        {
            query.push(("appsecret_proof", proof));
        }
        query
    }

    async fn read_page(response: reqwest::Response) -> Result<InsightsPage, FetchError> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GraphErrorEnvelope>(&body) {
                Ok(envelope) => describe_graph_error(&envelope.error),
                Err(_) => body.chars().take(200).collect(),
            };
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl InsightSource for GraphInsightsClient {
    #[instrument(skip(self))]
    async fn fetch_insights(
        &self,
        account_id: &str,
        range: DateRange,
        granularity: Granularity,
    ) -> Result<Vec<RawInsightRecord>, FetchError> {
        let token = self
            .config
            .access_token
            .as_ref()
            .ok_or(FetchError::MissingCredentials)?;

        let response = self
            .client
            .get(self.insights_url(account_id))
            .query(&self.first_page_query(token, range, granularity))
            .send()
            .await
            .map_err(map_transport_error)?;

        let mut page = Self::read_page(response).await?;
        let mut records = std::mem::take(&mut page.data);
        let mut pages = 1usize;

        // `next` already carries the token and every query parameter.
        while let Some(next) = page.paging.and_then(|paging| paging.next) {
            if pages >= self.config.max_pages {
                return Err(FetchError::PageLimit(self.config.max_pages));
            }
            let response = self
                .client
                .get(next)
                .send()
                .await
                .map_err(map_transport_error)?;
            page = Self::read_page(response).await?;
            records.append(&mut page.data);
            pages += 1;
        }

        debug!(pages, rows = records.len(), "insights pages read");
        Ok(records)
    }
}

/// The Graph API addresses ad accounts as `act_<id>`.
pub fn normalize_account_id(account_id: &str) -> String {
    let trimmed = account_id.trim();
    if trimmed.starts_with("act_") {
        trimmed.to_string()
    } else {
        format!("act_{trimmed}")
    }
}

/// Hex HMAC-SHA256 of the access token keyed by the app secret.
pub fn appsecret_proof(app_secret: &SecretString, access_token: &SecretString) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(app_secret.expose_secret().as_bytes()).ok()?;
    mac.update(access_token.expose_secret().as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn describe_graph_error(error: &GraphErrorBody) -> String {
    match (&error.kind, error.code) {
        (Some(kind), Some(code)) => format!("{kind} #{code}: {}", error.message),
        (Some(kind), None) => format!("{kind}: {}", error.message),
        (None, Some(code)) => format!("#{code}: {}", error.message),
        (None, None) => error.message.clone(),
    }
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_ids_gain_the_act_prefix_once() {
        assert_eq!(normalize_account_id("123"), "act_123");
        assert_eq!(normalize_account_id(" act_123 "), "act_123");
    }

    #[test]
    fn appsecret_proof_matches_reference_hmac() {
        let proof = appsecret_proof(
            &SecretString::from("key"),
            &SecretString::from("The quick brown fox jumps over the lazy dog"),
        )
        .expect("proof computed");
        assert_eq!(
            proof,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn insights_url_joins_base_version_and_account() {
        let client = GraphInsightsClient::new(GraphApiConfig {
            base_url: "https://graph.example.com/".to_string(),
            ..GraphApiConfig::default()
        })
        .expect("client builds");
        assert_eq!(
            client.insights_url("42"),
            "https://graph.example.com/v19.0/act_42/insights"
        );
    }

    #[test]
    fn graph_errors_keep_type_and_code() {
        let body = GraphErrorBody {
            message: "User request limit reached".to_string(),
            kind: Some("OAuthException".to_string()),
            code: Some(17),
        };
        assert_eq!(
            describe_graph_error(&body),
            "OAuthException #17: User request limit reached"
        );
    }
}
