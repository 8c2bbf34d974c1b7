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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub mail: MailConfig,
    pub jobs: JobsConfig,
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

        let data_path = env::var("APP_DATA_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let sender = env::var("APP_MAIL_FROM").unwrap_or_else(|_| "noreply@swipe.local".to_string());
        if !sender.contains('@') {
            return Err(ConfigError::InvalidMailSender(sender));
        }

        let in_process = match env::var("APP_JOBS_IN_PROCESS") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag("APP_JOBS_IN_PROCESS"))?,
            Err(_) => false,
        };
        let interval_secs = env::var("APP_JOBS_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_JOB_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidJobInterval)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            store: StoreConfig { data_path },
            mail: MailConfig { sender },
            jobs: JobsConfig {
                in_process,
                interval_secs,
            },
        })
    }
}

const DEFAULT_JOB_INTERVAL_SECS: u64 = 24 * 60 * 60;

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
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
    /// Colored output, enabled for local development only.
    pub ansi: bool,
}

/// SQLite file backing the entity store. `None` keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub data_path: Option<PathBuf>,
}

/// Outbound notification settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender: String,
}

/// Expiry sweep scheduling.
#[derive(Debug, Clone)]
pub struct JobsConfig {
    pub in_process: bool,
    pub interval_secs: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMailSender(String),
    InvalidFlag(&'static str),
    InvalidJobInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMailSender(value) => {
                write!(f, "APP_MAIL_FROM must be an e-mail address, got '{value}'")
            }
            ConfigError::InvalidFlag(name) => write!(f, "{name} must be a boolean flag"),
            ConfigError::InvalidJobInterval => {
                write!(f, "APP_JOBS_INTERVAL_SECS must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
