use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;
use crate::translation::invoker::ModelPair;
use crate::translation::retry::{RetryPolicy, DEFAULT_DELAY_UNIT, DEFAULT_MAX_RETRIES};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_api_url: String,
    pub primary_model: String,
    pub fallback_model: String,
    /// Service name used to pick credentials from the pool.
    pub credential_service: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            llm_api_url: env_or("LLM_API_URL", ANTHROPIC_API_URL),
            primary_model: env_or("LLM_PRIMARY_MODEL", "claude-haiku-4-5"),
            fallback_model: env_or("LLM_FALLBACK_MODEL", "claude-sonnet-4-5"),
            credential_service: env_or("LLM_CREDENTIAL_SERVICE", "anthropic"),
            max_retries: parse_env("TRANSLATION_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            retry_delay_ms: parse_env(
                "TRANSLATION_RETRY_DELAY_MS",
                DEFAULT_DELAY_UNIT.as_millis() as u64,
            )?,
        })
    }

    pub fn model_pair(&self) -> ModelPair {
        ModelPair {
            primary: self.primary_model.clone(),
            fallback: self.fallback_model.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay_unit: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "postgres://localhost/translator".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            llm_api_url: ANTHROPIC_API_URL.to_string(),
            primary_model: "claude-haiku-4-5".to_string(),
            fallback_model: "claude-sonnet-4-5".to_string(),
            credential_service: "anthropic".to_string(),
            max_retries: 4,
            retry_delay_ms: 250,
        }
    }

    #[test]
    fn test_retry_policy_from_config() {
        let policy = config().retry_policy();
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.delay_unit, Duration::from_millis(250));
    }

    #[test]
    fn test_model_pair_from_config() {
        let models = config().model_pair();
        assert_eq!(models.primary, "claude-haiku-4-5");
        assert_eq!(models.fallback, "claude-sonnet-4-5");
    }

    #[test]
    fn test_parse_value_names_the_variable() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert_eq!(parse_value::<u32>("TRANSLATION_MAX_RETRIES", " 3 ").unwrap(), 3);
    }
}
