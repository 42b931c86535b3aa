//! # Configuration Settings
//!
//! Connection, polling and logging settings for talking to a BIG-IP.

use crate::errors::{BigIpError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Connection settings for a single appliance
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BigIpConfig {
    /// Management address, with or without scheme (e.g. "10.1.1.4" or "https://bigip.lab")
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Management port; omitted from the URL when `None`
    pub port: Option<u16>,

    /// Management user
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,

    /// Management password
    #[serde(skip_serializing, default)]
    pub password: String,

    /// Exchange credentials for an X-F5-Auth-Token instead of sending basic auth
    pub token_auth: bool,

    /// Login provider used for token auth
    #[validate(length(min = 1, message = "Login provider cannot be empty"))]
    pub login_provider: String,

    /// Request timeout in seconds
    #[validate(range(
        min = 1,
        max = 600,
        message = "Timeout must be between 1 and 600 seconds"
    ))]
    pub timeout_seconds: u64,

    /// Accept any server certificate (lab appliances ship self-signed certs)
    pub insecure_skip_verify: bool,

    /// PEM bundle to trust in addition to the system roots
    pub trusted_cert_path: Option<String>,

    /// Polling settings for long-running appliance tasks
    #[validate(nested)]
    pub poll: PollConfig,
}

impl Default for BigIpConfig {
    fn default() -> Self {
        Self {
            host: "https://127.0.0.1".to_string(),
            port: None,
            username: "admin".to_string(),
            password: String::new(),
            token_auth: false,
            login_provider: "tmos".to_string(),
            timeout_seconds: 30,
            insecure_skip_verify: false,
            trusted_cert_path: None,
            poll: PollConfig::default(),
        }
    }
}

impl BigIpConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(BigIpError::from)?;

        url::Url::parse(&self.base_url()).map_err(|e| {
            BigIpError::config_with_source(format!("Invalid host '{}'", self.host), Box::new(e))
        })?;

        if self.poll.initial_interval_ms > self.poll.max_interval_ms {
            return Err(BigIpError::validation_field(
                "Initial poll interval cannot exceed the maximum interval",
                "poll.initial_interval_ms",
            ));
        }

        Ok(())
    }

    /// Base URL of the management API, without a trailing slash
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        }
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Create BigIpConfig from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create BigIpConfig from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("BIGIP_HOST").unwrap_or(defaults.host);
        let port = lookup("BIGIP_PORT").and_then(|s| s.parse::<u16>().ok());
        let username = lookup("BIGIP_USERNAME").unwrap_or(defaults.username);
        let password = lookup("BIGIP_PASSWORD").unwrap_or_default();
        let token_auth = lookup("BIGIP_TOKEN_AUTH").map(|s| parse_flag(&s)).unwrap_or(false);
        let login_provider = lookup("BIGIP_LOGIN_PROVIDER").unwrap_or(defaults.login_provider);
        let timeout_seconds = lookup("BIGIP_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);
        let insecure_skip_verify =
            lookup("BIGIP_INSECURE").map(|s| parse_flag(&s)).unwrap_or(false);
        let trusted_cert_path = lookup("BIGIP_TRUSTED_CERT").filter(|s| !s.is_empty());

        let mut poll = PollConfig::default();
        if let Some(attempts) = lookup("BIGIP_POLL_MAX_ATTEMPTS").and_then(|s| s.parse().ok()) {
            poll.max_attempts = attempts;
        }
        if let Some(interval) = lookup("BIGIP_POLL_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            poll.initial_interval_ms = interval;
            poll.max_interval_ms = poll.max_interval_ms.max(interval);
        }

        Self {
            host,
            port,
            username,
            password,
            token_auth,
            login_provider,
            timeout_seconds,
            insecure_skip_verify,
            trusted_cert_path,
            poll,
        }
    }
}

/// Bounded retry settings for status polling
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PollConfig {
    /// Maximum number of status reads before giving up
    #[validate(range(min = 1, max = 10000, message = "Max attempts must be between 1 and 10000"))]
    pub max_attempts: u32,

    /// Delay after the first non-terminal read
    pub initial_interval_ms: u64,

    /// Upper bound for the delay between reads
    pub max_interval_ms: u64,

    /// Factor applied to the delay after each non-terminal read
    #[validate(range(min = 1.0, max = 10.0, message = "Backoff multiplier must be between 1 and 10"))]
    pub backoff_multiplier: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            initial_interval_ms: 1_000,
            max_interval_ms: 15_000,
            backoff_multiplier: 1.5,
        }
    }
}

impl PollConfig {
    /// Delay to wait after the given (1-based) non-terminal attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(64) as i32;
        let scaled = self.initial_interval_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = scaled.min(self.max_interval_ms as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl LoggingConfig {
    /// Create LoggingConfig from environment variables
    pub fn from_env() -> Self {
        let log_level = std::env::var("BIGIP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let json_logging =
            std::env::var("BIGIP_LOG_JSON").map(|s| parse_flag(&s)).unwrap_or(false);

        Self { log_level, json_logging }
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = BigIpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "https://127.0.0.1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_normalisation() {
        let mut config = BigIpConfig { host: "10.1.1.4/".to_string(), ..Default::default() };
        assert_eq!(config.base_url(), "https://10.1.1.4");

        config.port = Some(8443);
        assert_eq!(config.base_url(), "https://10.1.1.4:8443");

        config.host = "http://127.0.0.1".to_string();
        config.port = None;
        assert_eq!(config.base_url(), "http://127.0.0.1");
    }

    #[test]
    fn test_from_lookup() {
        let config = BigIpConfig::from_lookup(lookup_from(&[
            ("BIGIP_HOST", "bigip.lab"),
            ("BIGIP_PORT", "8443"),
            ("BIGIP_USERNAME", "ops"),
            ("BIGIP_PASSWORD", "secret"),
            ("BIGIP_TOKEN_AUTH", "true"),
            ("BIGIP_INSECURE", "1"),
            ("BIGIP_POLL_MAX_ATTEMPTS", "5"),
            ("BIGIP_POLL_INTERVAL_MS", "250"),
        ]));

        assert_eq!(config.base_url(), "https://bigip.lab:8443");
        assert_eq!(config.username, "ops");
        assert_eq!(config.password, "secret");
        assert!(config.token_auth);
        assert!(config.insecure_skip_verify);
        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.poll.initial_interval_ms, 250);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = BigIpConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.username, "admin");
        assert_eq!(config.login_provider, "tmos");
        assert!(!config.token_auth);
        assert_eq!(config.poll.max_attempts, 60);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = BigIpConfig { host: String::new(), ..Default::default() };
        assert!(config.validate().is_err());

        let config = BigIpConfig { timeout_seconds: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let mut config = BigIpConfig::default();
        config.poll.initial_interval_ms = 20_000;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BigIpError::Validation { .. }));
    }

    #[test]
    fn test_poll_delay_backoff_is_capped() {
        let poll = PollConfig {
            max_attempts: 10,
            initial_interval_ms: 100,
            max_interval_ms: 300,
            backoff_multiplier: 2.0,
        };
        assert_eq!(poll.delay_after(1), Duration::from_millis(100));
        assert_eq!(poll.delay_after(2), Duration::from_millis(200));
        assert_eq!(poll.delay_after(3), Duration::from_millis(300));
        assert_eq!(poll.delay_after(9), Duration::from_millis(300));
    }

    #[test]
    fn test_password_not_serialized() {
        let config = BigIpConfig { password: "hunter2".to_string(), ..Default::default() };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
