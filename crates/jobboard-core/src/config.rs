//! Job board configuration management
//!
//! Configuration is loaded once at startup from environment variables (or a
//! TOML file with environment overrides) and handed explicitly to the
//! services that need it. Nothing reads the environment after startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Development signing secret, used only when `JWT_SECRET` is not set
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-key-change-in-production";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Document store connection
    pub database: DatabaseConfig,

    /// Token and password settings
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Document store
        if let Ok(backend) = std::env::var("STORE_BACKEND") {
            config.database.backend = backend.parse()?;
        }
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            config.database.surrealdb_url = url;
        }
        if let Ok(user) = std::env::var("SURREALDB_USER") {
            config.database.surrealdb_user = user;
        }
        if let Ok(pass) = std::env::var("SURREALDB_PASS") {
            config.database.surrealdb_pass = pass;
        }
        if let Ok(ns) = std::env::var("SURREALDB_NAMESPACE") {
            config.database.surrealdb_namespace = ns;
        }
        if let Ok(db) = std::env::var("SURREALDB_DATABASE") {
            config.database.surrealdb_database = db;
        }

        // Auth
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.auth.jwt_issuer = issuer;
        }
        if let Ok(days) = std::env::var("JWT_LOGIN_TTL_DAYS") {
            config.auth.login_token_ttl_days = parse_ttl_days("JWT_LOGIN_TTL_DAYS", &days)?;
        }
        if let Ok(days) = std::env::var("JWT_SIGNUP_TTL_DAYS") {
            config.auth.signup_token_ttl_days = parse_ttl_days("JWT_SIGNUP_TTL_DAYS", &days)?;
        }
        if let Ok(header) = std::env::var("AUTH_TOKEN_HEADER") {
            config.auth.token_header = header.trim().to_lowercase();
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        if env_config.server.host != ServerConfig::default().host {
            self.server.host = env_config.server.host;
        }
        if env_config.server.port != ServerConfig::default().port {
            self.server.port = env_config.server.port;
        }
        if env_config.database.surrealdb_url != DatabaseConfig::default().surrealdb_url {
            self.database.surrealdb_url = env_config.database.surrealdb_url;
        }

        // Always use env for secrets
        if std::env::var("JWT_SECRET").is_ok() {
            self.auth.jwt_secret = env_config.auth.jwt_secret;
        }
        if std::env::var("SURREALDB_PASS").is_ok() {
            self.database.surrealdb_pass = env_config.database.surrealdb_pass;
        }

        Ok(self)
    }
}

/// `0` and `none` select unbounded tokens
fn parse_ttl_days(key: &str, value: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(days) => Ok(Some(days)),
        Err(_) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS (empty = any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 2000,
            cors_enabled: true,
            cors_origins: vec![],
        }
    }
}

/// Which document store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    SurrealDb,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "surrealdb" | "surreal" => Ok(Self::SurrealDb),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORE_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Document store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store backend
    pub backend: StoreBackend,

    /// SurrealDB WebSocket URL
    pub surrealdb_url: String,

    /// SurrealDB username
    pub surrealdb_user: String,

    /// SurrealDB password
    pub surrealdb_pass: String,

    /// SurrealDB namespace
    pub surrealdb_namespace: String,

    /// SurrealDB database name
    pub surrealdb_database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::SurrealDb,
            surrealdb_url: "ws://localhost:8000".to_string(),
            surrealdb_user: "root".to_string(),
            surrealdb_pass: "root".to_string(),
            surrealdb_namespace: "jobboard".to_string(),
            surrealdb_database: "jobboard".to_string(),
        }
    }
}

/// Token and credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret for tokens
    pub jwt_secret: String,

    /// Token issuer identifier
    pub jwt_issuer: String,

    /// Lifetime of tokens issued at login (None = unbounded)
    pub login_token_ttl_days: Option<u64>,

    /// Lifetime of tokens issued at signup (None = unbounded)
    pub signup_token_ttl_days: Option<u64>,

    /// Request header carrying the token
    pub token_header: String,
}

impl AuthConfig {
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            jwt_issuer: "jobboard-api".to_string(),
            login_token_ttl_days: Some(365),
            signup_token_ttl_days: Some(365),
            token_header: "x-auth-header".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 2000);
        assert_eq!(config.auth.token_header, "x-auth-header");
        assert_eq!(config.auth.login_token_ttl_days, Some(365));
        assert_eq!(config.auth.signup_token_ttl_days, Some(365));
        assert!(config.auth.uses_development_secret());
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!(
            "SurrealDB".parse::<StoreBackend>().unwrap(),
            StoreBackend::SurrealDb
        );
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_ttl_days() {
        assert_eq!(parse_ttl_days("K", "30").unwrap(), Some(30));
        assert_eq!(parse_ttl_days("K", "0").unwrap(), None);
        assert_eq!(parse_ttl_days("K", "none").unwrap(), None);
        assert!(parse_ttl_days("K", "forever").is_err());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000
            cors_enabled = false
            cors_origins = []

            [database]
            backend = "memory"
            surrealdb_url = "ws://db:8000"
            surrealdb_user = "root"
            surrealdb_pass = "root"
            surrealdb_namespace = "jobboard"
            surrealdb_database = "jobboard"

            [auth]
            jwt_secret = "file-secret"
            jwt_issuer = "jobboard-api"
            signup_token_ttl_days = 365
            token_header = "x-auth-header"

            [logging]
            level = "debug"
            json_format = true
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.auth.login_token_ttl_days, None);
        assert_eq!(config.auth.signup_token_ttl_days, Some(365));
        assert!(config.logging.json_format);
    }
}
