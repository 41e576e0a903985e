//! Configuration validation module

use crate::config::{PolicyConfig, RateLimitConfig, ServerConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Rate limit configuration error: {message}")]
    RateLimit { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // Note: u16 cannot exceed 65535, so we only need to check for 0
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty".to_string()));
        }

        if !self.upstream_url.starts_with("http://") && !self.upstream_url.starts_with("https://") {
            return Err(ValidationError::server(format!(
                "Upstream URL must be an http(s) URL, got '{}'",
                self.upstream_url
            )));
        }

        if self.max_body_bytes == 0 {
            return Err(ValidationError::server(
                "Max body size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for PolicyConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.prefix.starts_with('/') {
            return Err(ValidationError::rate_limit(format!(
                "Policy prefix must start with '/', got '{}'",
                self.prefix
            )));
        }

        if self.max_requests == 0 {
            return Err(ValidationError::rate_limit(
                "Policy max_requests must be greater than 0".to_string(),
            ));
        }

        if self.window_seconds == 0 {
            return Err(ValidationError::rate_limit(
                "Policy window must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.auth.validate()?;
        self.general.validate()?;

        if self.cleanup_interval_seconds == 0 {
            return Err(ValidationError::rate_limit(
                "Cleanup interval must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}
