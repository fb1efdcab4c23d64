//! Server configuration from the environment.

use data::DEFAULT_BASE_URL;
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A variable is set but cannot be used
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind address (`HOST`)
    pub host: String,
    /// Bind port (`PORT`)
    pub port: u16,
    /// Chart endpoint of the market data provider (`YAHOO_BASE_URL`)
    pub yahoo_base_url: String,
    /// Allow cross-origin requests from anywhere (`CORS_ALLOW_ANY`)
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            cors_allow_any: true,
        }
    }
}

impl ServerConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: value.clone(),
                reason: "expected a port number".to_string(),
            })?,
            None => defaults.port,
        };

        let cors_allow_any = match lookup("CORS_ALLOW_ANY") {
            Some(value) => parse_flag("CORS_ALLOW_ANY", &value)?,
            None => defaults.cors_allow_any,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            cors_allow_any,
        })
    }

    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "HOST".to_string(),
            value: self.host.clone(),
            reason: "expected an IP address".to_string(),
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
