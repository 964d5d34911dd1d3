use secrecy::SecretString;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_ACCOUNT_NAME_1: &str = "Bella Serra";
const DEFAULT_ACCOUNT_NAME_2: &str = "Vista Bella";
const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
const DEFAULT_GRAPH_VERSION: &str = "v19.0";
const DEFAULT_EXCLUDED_TERMS: &str = "vaga,vagas";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub graph: GraphApiConfig,
    pub accounts: [AdAccountConfig; 2],
    pub excluded_campaign_terms: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let timeout_secs = parse_u64_var("GRAPH_API_TIMEOUT_SECS", 30)?;
        let max_pages = parse_u64_var("GRAPH_API_MAX_PAGES", 50)?;
        let graph = GraphApiConfig {
            base_url: env::var("GRAPH_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GRAPH_BASE_URL.to_string()),
            api_version: env::var("GRAPH_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_GRAPH_VERSION.to_string()),
            app_id: optional_var("MY_APP_ID"),
            app_secret: optional_var("MY_APP_SECRET").map(SecretString::from),
            access_token: optional_var("MY_ACCESS_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
            max_pages: usize::try_from(max_pages).unwrap_or(usize::MAX),
        };

        let accounts = [
            AdAccountConfig {
                name: env::var("AD_ACCOUNT_NAME_1")
                    .unwrap_or_else(|_| DEFAULT_ACCOUNT_NAME_1.to_string()),
                account_id: optional_var("AD_ACCOUNT_ID_1"),
            },
            AdAccountConfig {
                name: env::var("AD_ACCOUNT_NAME_2")
                    .unwrap_or_else(|_| DEFAULT_ACCOUNT_NAME_2.to_string()),
                account_id: optional_var("AD_ACCOUNT_ID_2"),
            },
        ];

        let excluded_campaign_terms = parse_terms(
            &env::var("EXCLUDED_CAMPAIGN_TERMS")
                .unwrap_or_else(|_| DEFAULT_EXCLUDED_TERMS.to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            graph,
            accounts,
            excluded_campaign_terms,
        })
    }
}

/// Returns `None` for unset or blank variables.
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u64_var(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional_var(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        None => Ok(default),
    }
}

pub(crate) fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the Graph API insights endpoint.
#[derive(Debug, Clone)]
pub struct GraphApiConfig {
    pub base_url: String,
    pub api_version: String,
    pub app_id: Option<String>,
    pub app_secret: Option<SecretString>,
    pub access_token: Option<SecretString>,
    pub timeout: Duration,
    pub max_pages: usize,
}

impl Default for GraphApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            api_version: DEFAULT_GRAPH_VERSION.to_string(),
            app_id: None,
            app_secret: None,
            access_token: None,
            timeout: Duration::from_secs(30),
            max_pages: 50,
        }
    }
}

/// One of the two reported ad accounts. A missing id means the account is not configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdAccountConfig {
    pub name: String,
    pub account_id: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MY_APP_ID",
            "MY_APP_SECRET",
            "MY_ACCESS_TOKEN",
            "AD_ACCOUNT_ID_1",
            "AD_ACCOUNT_ID_2",
            "AD_ACCOUNT_NAME_1",
            "AD_ACCOUNT_NAME_2",
            "GRAPH_API_BASE_URL",
            "GRAPH_API_VERSION",
            "GRAPH_API_TIMEOUT_SECS",
            "GRAPH_API_MAX_PAGES",
            "EXCLUDED_CAMPAIGN_TERMS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.accounts[0].name, "Bella Serra");
        assert_eq!(config.accounts[1].name, "Vista Bella");
        assert!(config.accounts.iter().all(|a| a.account_id.is_none()));
        assert_eq!(config.excluded_campaign_terms, vec!["vaga", "vagas"]);
        assert_eq!(config.graph.timeout, Duration::from_secs(30));
        assert!(config.graph.access_token.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_accounts_and_credentials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AD_ACCOUNT_ID_1", " act_111 ");
        env::set_var("AD_ACCOUNT_ID_2", "   ");
        env::set_var("MY_ACCESS_TOKEN", "token-abc");
        env::set_var("EXCLUDED_CAMPAIGN_TERMS", " Vaga, ,Recrutamento ");
        let config = AppConfig::load().expect("config loads");

        assert_eq!(config.accounts[0].account_id.as_deref(), Some("act_111"));
        assert_eq!(config.accounts[1].account_id, None);
        assert_eq!(
            config
                .graph
                .access_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            Some("token-abc".to_string())
        );
        assert_eq!(config.excluded_campaign_terms, vec!["vaga", "recrutamento"]);
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GRAPH_API_TIMEOUT_SECS", "soon");
        let err = AppConfig::load().expect_err("timeout must be numeric");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "GRAPH_API_TIMEOUT_SECS"
            }
        ));
        reset_env();
    }
}
