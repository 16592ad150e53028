//! Application configuration loading.
//!
//! Settings come from a TOML file (`config.toml` by default, or the path in
//! `CONFIG_PATH`). `DATABASE_URL` and `JWT_SECRET` from the environment take
//! precedence over the file, which lets secrets stay out of it entirely.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Minimum length of the token signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Store connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Secret used to sign and verify access tokens
    #[serde(default)]
    pub jwt_secret: String,
    /// Administrator account created on startup when missing
    #[serde(default)]
    pub bootstrap_admin: Option<AdminSeed>,
}

/// Credentials for the administrator seeded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    /// Display name of the administrator
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain-text password, hashed before it is stored
    pub password: String,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            jwt_secret: String::new(),
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })
    }

    /// Replaces file values with `DATABASE_URL` / `JWT_SECRET` when those are set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        self
    }

    /// Checks settings that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config {
                message: format!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"),
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(Error::Config {
                message: "database_url cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    AppConfig::from_toml_str(&contents)
}

/// Default config file, read only when present.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Reads the config file. An explicitly named file must exist; the default
/// `config.toml` is optional.
fn read_config_file(explicit_path: Option<&str>) -> Result<AppConfig> {
    match explicit_path {
        Some(path) if !Path::new(path).exists() => Err(Error::Config {
            message: format!("Config file set by CONFIG_PATH not found: {path}"),
        }),
        Some(path) => {
            debug!("Loading configuration from {path}");
            load_config(path)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            debug!("Loading configuration from {DEFAULT_CONFIG_PATH}");
            load_config(DEFAULT_CONFIG_PATH)
        }
        None => {
            info!("No config file at {DEFAULT_CONFIG_PATH}, using defaults and environment");
            Ok(AppConfig::default())
        }
    }
}

/// Loads the full application configuration: file (if present), then
/// environment overrides, then validation.
///
/// # Errors
/// Returns an error if `CONFIG_PATH` names a missing file, the file is
/// invalid, or the resulting configuration fails validation.
pub fn load_app_config() -> Result<AppConfig> {
    let explicit_path = std::env::var("CONFIG_PATH").ok();
    let config = read_config_file(explicit_path.as_deref())?.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            database_url = "sqlite::memory:"
            jwt_secret = "0123456789abcdef0123456789abcdef"

            [bootstrap_admin]
            name = "Site Admin"
            email = "admin@example.com"
            password = "change-me-now"
        "#;

        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.validate().is_ok());

        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.name, "Site Admin");
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = AppConfig {
            jwt_secret: "too-short".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let result = read_config_file(Some("does/not/exist/order_desk.toml"));
        match result {
            Err(Error::Config { message }) => assert!(message.contains("not found")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_config_path_is_loaded() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
        let config = read_config_file(Some(path)).unwrap();
        assert!(config.bootstrap_admin.is_some());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = AppConfig::from_toml_str("database_url = [");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
