use crate::leaderboard::{
    GroupingField, GroupingMap, RankingPolicy, DEFAULT_ROOKIE_THRESHOLD, DEFAULT_WINDOW_SIZE,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

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
    pub ranking: RankingPolicy,
    pub storage: StorageConfig,
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
        let ansi = match env::var("APP_LOG_ANSI") {
            Ok(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => environment == AppEnvironment::Development,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            ranking: load_ranking_policy()?,
            storage: load_storage()?,
        })
    }
}

fn load_ranking_policy() -> Result<RankingPolicy, ConfigError> {
    let rookie_threshold = match env::var("LEADERBOARD_ROOKIE_THRESHOLD") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidRookieThreshold)?,
        Err(_) => DEFAULT_ROOKIE_THRESHOLD,
    };

    let window_size = match env::var("LEADERBOARD_WINDOW_SIZE") {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or(ConfigError::InvalidWindowSize)?,
        Err(_) => DEFAULT_WINDOW_SIZE,
    };

    let grouping = match env::var("LEADERBOARD_BRANCH_FIELD") {
        Ok(raw) => GroupingMap::with_branch_field(
            raw.parse::<GroupingField>()
                .map_err(|_| ConfigError::InvalidBranchField { value: raw })?,
        ),
        Err(_) => GroupingMap::default(),
    };

    Ok(RankingPolicy {
        rookie_threshold,
        window_size,
        grouping,
    })
}

fn load_storage() -> Result<StorageConfig, ConfigError> {
    let dataset_path = env::var("LEADERBOARD_DATASET_PATH")
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from);

    let max_upload_bytes = match env::var("LEADERBOARD_MAX_UPLOAD_BYTES") {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ConfigError::InvalidUploadLimit)?,
        Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
    };

    Ok(StorageConfig {
        dataset_path,
        max_upload_bytes,
    })
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
    /// Colored output; on by default only in development.
    pub ansi: bool,
}

/// Where the latest upload lives between restarts, and how large it may be.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dataset_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRookieThreshold,
    InvalidWindowSize,
    InvalidBranchField { value: String },
    InvalidUploadLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRookieThreshold => write!(
                f,
                "LEADERBOARD_ROOKIE_THRESHOLD must be a non-negative number of months"
            ),
            ConfigError::InvalidWindowSize => {
                write!(f, "LEADERBOARD_WINDOW_SIZE must be a positive integer")
            }
            ConfigError::InvalidBranchField { value } => write!(
                f,
                "LEADERBOARD_BRANCH_FIELD must be 'branch_unit' or 'region', got '{}'",
                value
            ),
            ConfigError::InvalidUploadLimit => {
                write!(f, "LEADERBOARD_MAX_UPLOAD_BYTES must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRookieThreshold
            | ConfigError::InvalidWindowSize
            | ConfigError::InvalidBranchField { .. }
            | ConfigError::InvalidUploadLimit => None,
        }
    }
}
