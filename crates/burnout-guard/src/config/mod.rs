use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Hosted inference endpoint for the pretrained emotion model.
pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base";

/// SQLite file holding analyzed entries.
pub const DEFAULT_DATABASE_PATH: &str = "data/burnout_tracker.db";

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
    pub classifier: ClassifierConfig,
    pub storage: StorageConfig,
    /// Optional JSON file replacing the standard weight tables.
    pub weights_path: Option<PathBuf>,
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

        let backend = match env::var("BURNOUT_CLASSIFIER") {
            Ok(value) => ClassifierBackend::parse(&value)?,
            Err(_) => ClassifierBackend::Lexicon,
        };
        let endpoint = env::var("BURNOUT_CLASSIFIER_URL")
            .unwrap_or_else(|_| DEFAULT_CLASSIFIER_URL.to_string());
        let api_token = env::var("BURNOUT_CLASSIFIER_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let fallback_on_failure = parse_flag("BURNOUT_CLASSIFIER_FALLBACK", false)?;

        let storage_kind = match env::var("BURNOUT_STORAGE") {
            Ok(value) => StorageKind::parse(&value)?,
            Err(_) => StorageKind::Sqlite,
        };
        let database_path = env::var("BURNOUT_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        let weights_path = env::var("BURNOUT_WEIGHTS_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            classifier: ClassifierConfig {
                backend,
                endpoint,
                api_token,
                fallback_on_failure,
            },
            storage: StorageConfig {
                kind: storage_kind,
                database_path,
            },
            weights_path,
        })
    }
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value: raw }),
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
}

/// Which emotion classifier backs the signal adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// Deterministic keyword classifier running in-process.
    Lexicon,
    /// Hosted text-classification endpoint.
    Remote,
}

impl ClassifierBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "lexicon" | "local" => Ok(Self::Lexicon),
            "remote" | "http" | "huggingface" => Ok(Self::Remote),
            _ => Err(ConfigError::InvalidClassifier {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    pub endpoint: String,
    pub api_token: Option<String>,
    /// When set, a failing classifier yields a text-free analysis instead of an error.
    pub fallback_on_failure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Memory,
}

impl StorageKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "sqlite" | "file" => Ok(Self::Sqlite),
            "memory" | "ephemeral" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidStorage {
                value: value.to_string(),
            }),
        }
    }
}

/// Where analyzed entries are appended.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub database_path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidClassifier { value: String },
    InvalidStorage { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidClassifier { value } => write!(
                f,
                "BURNOUT_CLASSIFIER must be 'lexicon' or 'remote' (got '{value}')"
            ),
            ConfigError::InvalidStorage { value } => write!(
                f,
                "BURNOUT_STORAGE must be 'sqlite' or 'memory' (got '{value}')"
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag (got '{value}')")
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
