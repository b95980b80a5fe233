//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    // === Listing ===
    /// Page size used when a list request has no usable `limit`.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    /// Largest page size a client may request. Unset means no cap.
    #[serde(default)]
    pub max_page_limit: Option<usize>,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_page_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
            verbose: false,
            default_page_limit: default_page_limit(),
            max_page_limit: None,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(format!("HOST is not a valid IP address: {}", self.host));
        }

        if self.default_page_limit == 0 {
            return Err("DEFAULT_PAGE_LIMIT must be at least 1".to_string());
        }

        if let Some(max) = self.max_page_limit {
            if max == 0 {
                return Err("MAX_PAGE_LIMIT must be at least 1".to_string());
            }
            if self.default_page_limit > max {
                return Err("DEFAULT_PAGE_LIMIT must not exceed MAX_PAGE_LIMIT".to_string());
            }
        }

        Ok(())
    }

    /// Socket address to bind the HTTP listener to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            AppError::InvalidConfig(format!("HOST is not a valid IP address: {}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Whether logs should be emitted as JSON lines.
    pub fn is_json_logging(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
