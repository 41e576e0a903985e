//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::rate_limiter::types::{Policy, PolicyKind};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the backend the gate forwards admitted requests to
    pub upstream_url: String,
    /// Largest request body the gate will buffer for forwarding, in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            upstream_url: "http://127.0.0.1:8081".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// One rate-limit policy tier: a path-prefix match rule plus the fixed
/// window it enforces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Requests whose path starts with this prefix are checked against
    /// the policy
    pub prefix: String,
    /// Maximum requests admitted per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl PolicyConfig {
    /// Convert to the runtime Policy
    pub fn to_policy(&self, kind: PolicyKind) -> Policy {
        Policy::new(
            kind,
            &self.prefix,
            self.max_requests,
            Duration::from_secs(self.window_seconds),
        )
    }
}

/// Rate limiting configuration
///
/// Two tiers apply: a strict one for authentication endpoints (brute-force
/// protection) and a looser one for the whole API surface. Authentication
/// paths fall under both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,
    /// Interval between background sweeps of expired buckets, in seconds
    pub cleanup_interval_seconds: u64,
    /// Brute-force protection for authentication endpoints
    pub auth: PolicyConfig,
    /// General limit for all API endpoints
    pub general: PolicyConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_interval_seconds: 300, // 5 minutes
            auth: PolicyConfig {
                prefix: "/api/auth/".to_string(),
                max_requests: 5,
                window_seconds: 60,
            },
            general: PolicyConfig {
                prefix: "/api/".to_string(),
                max_requests: 100,
                window_seconds: 60,
            },
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("BUDGET_GATE").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;

        // Validate the loaded configuration
        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
