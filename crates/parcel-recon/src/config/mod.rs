use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the reconciliation tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub feed: FeedConfig,
    /// Optional TOML file replacing the built-in classifier keyword tables.
    pub rules_path: Option<PathBuf>,
    /// Registry CSV used by the HTTP classify endpoint when a request carries none.
    pub registry_path: Option<PathBuf>,
    /// SPIs or propnums known to be subdivided parents in the reference snapshot.
    pub known_parents: Vec<String>,
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

        let source = non_empty_var("RECON_FEED_SOURCE");
        let output_path = non_empty_var("RECON_OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
        let progress_interval = match non_empty_var("RECON_PROGRESS_INTERVAL") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidProgressInterval { value: raw }),
            },
            None => DEFAULT_PROGRESS_INTERVAL,
        };

        let rules_path = non_empty_var("RECON_RULES_PATH").map(PathBuf::from);
        let registry_path = non_empty_var("RECON_REGISTRY_PATH").map(PathBuf::from);
        let known_parents = non_empty_var("RECON_PARENT_PARCELS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            feed: FeedConfig {
                source,
                output_path,
                progress_interval,
            },
            rules_path,
            registry_path,
            known_parents,
        })
    }
}

const DEFAULT_OUTPUT_PATH: &str = "edit_feed_validated.csv";
const DEFAULT_PROGRESS_INTERVAL: usize = 100;

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the edit feed comes from and where the annotated copy is written.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// File path or http(s) URL of the incoming edit feed.
    pub source: Option<String>,
    pub output_path: PathBuf,
    /// Number of rows between progress log lines.
    pub progress_interval: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidProgressInterval { value: String },
    MissingFeedSource,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidProgressInterval { value } => write!(
                f,
                "RECON_PROGRESS_INTERVAL must be a positive integer (got '{value}')"
            ),
            ConfigError::MissingFeedSource => write!(
                f,
                "no edit feed given; set RECON_FEED_SOURCE or pass --feed"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidProgressInterval { .. }
            | ConfigError::MissingFeedSource => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
