use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::USER_AGENT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as number: {source}")]
    ParseFloat {
        name: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // LLM
    pub perplexity_api_key: String,
    pub perplexity_base_url: String,
    pub perplexity_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,

    // Database
    pub database_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Platforms
    pub bluesky_base_url: String,
    pub linkedin_api_base: String,
    pub thread_post_delay_ms: u64,
    pub demo_post_delay_ms: u64,

    // HTTP
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // LLM
            perplexity_api_key: required_env("PERPLEXITY_API_KEY")?,
            perplexity_base_url: env_or_default("PERPLEXITY_BASE_URL", "https://api.perplexity.ai"),
            perplexity_model: env_or_default("PERPLEXITY_MODEL", "sonar"),
            llm_temperature: parse_env_f32("LLM_TEMPERATURE", 0.7)?,
            llm_max_tokens: parse_env_u32("LLM_MAX_TOKENS", 500)?,

            // Database
            database_path: PathBuf::from(env_or_default(
                "DATABASE_PATH",
                "./data/content_generator.sqlite",
            )),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Platforms
            bluesky_base_url: env_or_default("BLUESKY_BASE_URL", "https://bsky.social"),
            linkedin_api_base: env_or_default("LINKEDIN_API_BASE", "https://api.linkedin.com/v2"),
            thread_post_delay_ms: parse_env_u64("THREAD_POST_DELAY_MS", 500)?,
            demo_post_delay_ms: parse_env_u64("DEMO_POST_DELAY_MS", 1000)?,

            // HTTP
            http_timeout_secs: parse_env_u64("HTTP_TIMEOUT_SECS", 30)?,
        })
    }

    /// Configuration pointing at local placeholder endpoints with no delays.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            perplexity_api_key: "test-key".to_string(),
            perplexity_base_url: "http://127.0.0.1:9".to_string(),
            perplexity_model: "sonar".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 500,
            database_path: PathBuf::from(":memory:"),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            bluesky_base_url: "http://127.0.0.1:9".to_string(),
            linkedin_api_base: "http://127.0.0.1:9/v2".to_string(),
            thread_post_delay_ms: 0,
            demo_post_delay_ms: 0,
            http_timeout_secs: 5,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.perplexity_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "PERPLEXITY_API_KEY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::InvalidValue {
                name: "LLM_TEMPERATURE".to_string(),
                message: format!("must be between 0.0 and 2.0, got {}", self.llm_temperature),
            });
        }
        if self.llm_max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                name: "LLM_MAX_TOKENS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn thread_post_delay(&self) -> Duration {
        Duration::from_millis(self.thread_post_delay_ms)
    }

    #[must_use]
    pub fn demo_post_delay(&self) -> Duration {
        Duration::from_millis(self.demo_post_delay_ms)
    }

    /// Build the shared outbound HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(self.http_timeout_secs))
            .build()
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_f32(name: &str, default: f32) -> Result<f32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseFloat {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_testing_is_valid() {
        assert!(Config::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_temperature_range() {
        let config = Config {
            llm_temperature: 2.5,
            ..Config::for_testing()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LLM_TEMPERATURE"));
    }

    #[test]
    fn test_validate_max_tokens() {
        let config = Config {
            llm_max_tokens: 0,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_key() {
        let config = Config {
            perplexity_api_key: "  ".to_string(),
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delays() {
        let config = Config {
            thread_post_delay_ms: 250,
            ..Config::for_testing()
        };
        assert_eq!(config.thread_post_delay(), Duration::from_millis(250));
        assert_eq!(config.demo_post_delay(), Duration::ZERO);
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse_env_u64("NONEXISTENT_VAR", 7).unwrap(), 7);
        assert!((parse_env_f32("NONEXISTENT_VAR", 0.5).unwrap() - 0.5).abs() < f32::EPSILON);
    }
}
