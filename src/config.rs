use std::{fmt::Display, str::FromStr, time::Duration};

use crate::reliability::{Policy, RetryPolicy};

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://checkip.amazonaws.com/";

/// Merchant credentials and URLs used for every gateway call
#[derive(Clone)]
pub struct Config {
    /// Gateway base url without trailing slash, e.g. `https://sandbox.shurjopayment.com`
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Where the customer lands after paying or cancelling
    pub return_url: String,
    pub ip_lookup_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("return_url", &self.return_url)
            .field("ip_lookup_url", &self.ip_lookup_url)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl std::error::Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} is not defined"),
            ConfigError::Invalid(name) => write!(f, "{name} has invalid value"),
        }
    }
}

impl Config {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            username: username.into(),
            password: password.into(),
            return_url: return_url.into(),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_owned(),
        }
    }

    pub fn with_ip_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.ip_lookup_url = url.into();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let config = Self::new(
            required("SP_ENDPOINT")?,
            required("SP_USERNAME")?,
            required("SP_PASSWORD")?,
            required("SP_RETURN_URL")?,
        );
        Ok(match lookup("SP_IP_LOOKUP_URL") {
            Some(url) if !url.is_empty() => config.with_ip_lookup_url(url),
            _ => config,
        })
    }
}

impl Policy {
    /// Reads `SP_TIMEOUT_SECS`, `SP_RETRY_ATTEMPTS` and `SP_RETRY_DELAY_MS`.
    /// Unset variables keep the single attempt, no timeout behaviour.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = RetryPolicy::default();
        let timeout = parse::<u64>(&lookup, "SP_TIMEOUT_SECS")?.map(Duration::from_secs);
        let max_attempts =
            parse::<u32>(&lookup, "SP_RETRY_ATTEMPTS")?.unwrap_or(default.max_attempts);
        if max_attempts == 0 {
            return Err(ConfigError::Invalid("SP_RETRY_ATTEMPTS"));
        }
        let delay = parse::<u64>(&lookup, "SP_RETRY_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(default.delay);
        Ok(Self {
            timeout,
            retry: RetryPolicy {
                max_attempts,
                delay,
            },
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        _ => Ok(None),
    }
}
