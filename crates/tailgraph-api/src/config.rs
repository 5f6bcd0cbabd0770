use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_HOST: &str = "https://api.tailscale.com/api/v2/tailnet/";

#[derive(Debug)]
pub struct Config {
    pub bind_addr: String,
    pub max_page_size: usize,
    pub upstream: UpstreamConfig,
}

#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_base_host: String,
    pub tailnet_domain: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_base_host", &self.api_base_host)
            .field("tailnet_domain", &self.tailnet_domain)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {var}")]
    MissingEnvVar { var: &'static str },

    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("API_BASE_HOST is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingEnvVar { var })
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { var, value }),
        },
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_host =
            lookup("API_BASE_HOST").unwrap_or_else(|| DEFAULT_API_BASE_HOST.to_string());
        Url::parse(&api_base_host)?;

        let upstream = UpstreamConfig {
            api_base_host,
            tailnet_domain: require(&lookup, "TAILNET_DOMAIN")?,
            api_key: require(&lookup, "API_KEY")?,
            timeout: Duration::from_secs(positive(&lookup, "TIMEOUT", 2)?),
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            max_page_size: positive(&lookup, "MAX_PAGE_SIZE", 100)? as usize,
            upstream,
        })
    }
}
