use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEV_DEFAULT_JWT_SECRET: &str =
    "this_is_a_development_secret_key_that_is_at_least_64_characters_long_for_testing";

/// Authentication settings.
///
/// `enabled = false` is a process-wide switch that removes principal-based
/// scoping: every protected endpoint then runs as a superuser-equivalent
/// system principal (all rows visible).
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AuthSettings {
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,

    /// JWT signing secret (minimum 64 characters)
    #[validate(length(min = 64))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_expiration")]
    pub refresh_expiration_secs: u64,
}

fn default_auth_enabled() -> bool {
    true
}

fn default_jwt_expiration() -> u64 {
    3600
}

fn default_refresh_expiration() -> u64 {
    7 * 24 * 3600
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: DEV_DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_secs: default_jwt_expiration(),
            refresh_expiration_secs: default_refresh_expiration(),
        }
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment ("development", "production", ...)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,

    #[serde(default)]
    pub auth: AuthSettings,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_auto_migrate() -> bool {
    true
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load configuration: built-in defaults, then `config/{environment}.toml`
/// when present, then `DEALERDESK__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = std::env::var("DEALERDESK_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .set_default("database_url", "sqlite://dealerdesk.db?mode=rwc")?
        .set_default("environment", environment.clone())?
        .set_default("auth.jwt_secret", DEV_DEFAULT_JWT_SECRET)?;

    let config_file = Path::new(CONFIG_DIR).join(format!("{}.toml", environment));
    if config_file.exists() {
        builder = builder.add_source(File::from(config_file));
    }

    let settings = builder
        .add_source(Environment::with_prefix("DEALERDESK").separator("__"))
        .build()?;

    let cfg: AppConfig = settings.try_deserialize()?;
    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;
    cfg.auth
        .validate()
        .map_err(|e| ConfigError::Message(format!("invalid auth configuration: {}", e)))?;

    if cfg.is_production() && cfg.auth.jwt_secret == DEV_DEFAULT_JWT_SECRET {
        return Err(ConfigError::Message(
            "the development JWT secret must not be used in production".to_string(),
        ));
    }
    if !cfg.auth.enabled {
        info!("authentication disabled by configuration; all requests run unscoped");
    }

    Ok(cfg)
}

/// Initialize the global tracing subscriber.
pub fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_auth_settings_are_enabled() {
        let auth = AuthSettings::default();
        assert!(auth.enabled);
        assert!(auth.jwt_secret.len() >= 64);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let cfg = AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 9090,
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            auto_migrate: false,
            auth: AuthSettings::default(),
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9090");
        assert!(!cfg.is_production());
    }
}
