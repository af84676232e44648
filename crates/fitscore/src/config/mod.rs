use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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

/// Top-level configuration for the scoring service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub notifications: NotificationConfig,
    pub processing: ProcessingConfig,
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

        let notifications = NotificationConfig {
            admin_email: env::var("APP_ADMIN_EMAIL")
                .unwrap_or_else(|_| NotificationConfig::DEFAULT_ADMIN_EMAIL.to_string()),
            manager_email: env::var("APP_MANAGER_EMAIL")
                .unwrap_or_else(|_| NotificationConfig::DEFAULT_MANAGER_EMAIL.to_string()),
        };

        let defaults = ProcessingConfig::default();
        let processing = ProcessingConfig {
            async_evaluation_delay: delay_from_env(
                "APP_ASYNC_EVALUATION_DELAY_MS",
                defaults.async_evaluation_delay,
            )?,
            scheduled_report_delay: delay_from_env(
                "APP_SCHEDULED_REPORT_DELAY_MS",
                defaults.scheduled_report_delay,
            )?,
            real_time_delay: delay_from_env("APP_REAL_TIME_DELAY_MS", defaults.real_time_delay)?,
            batch_delay: delay_from_env("APP_BATCH_DELAY_MS", defaults.batch_delay)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            notifications,
            processing,
        })
    }
}

fn delay_from_env(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDelay { var }),
        Err(_) => Ok(default),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Recipients for the simulated e-mail and report events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub admin_email: String,
    pub manager_email: String,
}

impl NotificationConfig {
    pub const DEFAULT_ADMIN_EMAIL: &'static str = "admin@legal.com";
    pub const DEFAULT_MANAGER_EMAIL: &'static str = "manager@legal.com";
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            admin_email: Self::DEFAULT_ADMIN_EMAIL.to_string(),
            manager_email: Self::DEFAULT_MANAGER_EMAIL.to_string(),
        }
    }
}

/// Artificial delays applied by the background processing stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    pub async_evaluation_delay: Duration,
    pub scheduled_report_delay: Duration,
    pub real_time_delay: Duration,
    pub batch_delay: Duration,
}

impl ProcessingConfig {
    /// No delays at all; used by tests and the CLI demo.
    pub const fn immediate() -> Self {
        Self {
            async_evaluation_delay: Duration::ZERO,
            scheduled_report_delay: Duration::ZERO,
            real_time_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            async_evaluation_delay: Duration::from_millis(2000),
            scheduled_report_delay: Duration::from_millis(3000),
            real_time_delay: Duration::from_millis(1500),
            batch_delay: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDelay { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDelay { var } => {
                write!(f, "{var} must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDelay { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
