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

pub const DEFAULT_SINK_BASE_URL: &str = "https://app.asana.com/api/1.0";
pub const DEFAULT_APPLICATION_LABEL: &str = "TIS Application";

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub sink: SinkConfig,
    pub intake: IntakeConfig,
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

        let sink = SinkConfig {
            access_token: non_empty_var("ASANA_TOKEN"),
            project_id: non_empty_var("ASANA_PROJECT_ID"),
            base_url: non_empty_var("ASANA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SINK_BASE_URL.to_string()),
        };

        let intake = IntakeConfig {
            application_label: non_empty_var("PERMIT_APPLICATION_LABEL")
                .unwrap_or_else(|| DEFAULT_APPLICATION_LABEL.to_string()),
            catalog_path: non_empty_var("PERMIT_CATALOG_PATH").map(PathBuf::from),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            sink,
            intake,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Connection settings for the task-tracking sink.
#[derive(Clone)]
pub struct SinkConfig {
    pub access_token: Option<String>,
    pub project_id: Option<String>,
    pub base_url: String,
}

impl SinkConfig {
    /// Both the token and the project are needed before any task can be created.
    pub fn credentials(&self) -> Result<SinkCredentials, ConfigError> {
        match (&self.access_token, &self.project_id) {
            (Some(access_token), Some(project_id)) => Ok(SinkCredentials {
                access_token: access_token.clone(),
                project_id: project_id.clone(),
                base_url: self.base_url.trim_end_matches('/').to_string(),
            }),
            _ => Err(ConfigError::MissingSinkCredentials),
        }
    }
}

impl fmt::Debug for SinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct SinkCredentials {
    pub access_token: String,
    pub project_id: String,
    pub base_url: String,
}

impl fmt::Debug for SinkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkCredentials")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Intake-specific knobs: the task label and an optional catalog override.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub application_label: String,
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingSinkCredentials,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingSinkCredentials => {
                write!(f, "ASANA_TOKEN and ASANA_PROJECT_ID must both be set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::MissingSinkCredentials => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
