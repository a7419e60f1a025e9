use axum::http::HeaderValue;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

const DEFAULT_MODEL: &str = "claude-3-sonnet-20241022";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct PhraseConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub anthropic: AnthropicSettings,
    pub cors: CorsPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicSettings {
    pub api_key: Secret<String>,
    /// Model identifier sent with every request.
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Cross-origin policy applied to every route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CorsPolicy {
    /// Any origin, method and header.
    Permissive,
    /// Listed origins (`*` for any), `GET`/`POST`/`OPTIONS`, `Content-Type` only.
    Restricted { allowed_origins: Vec<String> },
}

impl PhraseConfig {
    /// Load from the process environment (after `.env`). Fails when the
    /// provider credential is missing.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("ANTHROPIC_API_KEY is required but not set"))
            })?;

        let cors_mode: CorsMode = get_env(&lookup, "CORS_MODE", "permissive")
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let cors = match cors_mode {
            CorsMode::Permissive => CorsPolicy::Permissive,
            CorsMode::Restricted => CorsPolicy::Restricted {
                allowed_origins: get_env(&lookup, "CORS_ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        };

        let config = PhraseConfig {
            common,
            service_name: get_env(&lookup, "SERVICE_NAME", "phrase-service"),
            service_version: get_env(&lookup, "SERVICE_VERSION", env!("CARGO_PKG_VERSION")),
            log_level: get_env(&lookup, "LOG_LEVEL", "info"),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|e| !e.is_empty()),
            anthropic: AnthropicSettings {
                api_key: Secret::new(api_key),
                model: get_env(&lookup, "ANTHROPIC_MODEL", DEFAULT_MODEL),
                max_tokens: parse_env(&lookup, "ANTHROPIC_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
                base_url: get_env(&lookup, "ANTHROPIC_BASE_URL", DEFAULT_BASE_URL)
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: parse_env(&lookup, "ANTHROPIC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            cors,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.anthropic.api_key.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ANTHROPIC_API_KEY must not be empty"
            )));
        }

        if self.anthropic.max_tokens == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ANTHROPIC_MAX_TOKENS must be greater than 0"
            )));
        }

        if self.anthropic.timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ANTHROPIC_TIMEOUT_SECS must be greater than 0"
            )));
        }

        if let CorsPolicy::Restricted { allowed_origins } = &self.cors {
            if allowed_origins.is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "CORS_ALLOWED_ORIGINS must list at least one origin in restricted mode"
                )));
            }
            for origin in allowed_origins {
                HeaderValue::from_str(origin).map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "Invalid CORS origin '{}': {}",
                        origin,
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorsMode {
    Permissive,
    Restricted,
}

impl FromStr for CorsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(CorsMode::Permissive),
            "restricted" => Ok(CorsMode::Restricted),
            _ => Err(format!("Invalid CORS mode: {}", s)),
        }
    }
}

fn get_env<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
