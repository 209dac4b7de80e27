use std::env;
use std::time::Duration;

use anyhow::Context;

pub const OPENAI_PROVIDER: &str = "openai";
pub const ANTHROPIC_PROVIDER: &str = "anthropic";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_model: String,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub provider_timeout_secs: u64,
    pub allowed_origin: Option<String>,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: Option<String>,
}

/// Connection details for one AI backend, ordered by `priority` (lower first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub name: &'static str,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub priority: u8,
}

impl ProviderSettings {
    pub fn credential_present(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Blank values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let provider_timeout_secs: u64 = var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("PROVIDER_TIMEOUT_SECS must be a number")?;
        anyhow::ensure!(
            provider_timeout_secs > 0,
            "PROVIDER_TIMEOUT_SECS must be greater than zero"
        );

        Ok(Self {
            port: var("APP_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("APP_PORT must be a number")?,
            environment: var("APP_ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            openai_api_key: var("OPENAI_API_KEY"),
            anthropic_api_key: var("CLAUDE_API_KEY").or_else(|| var("ANTHROPIC_API_KEY")),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            anthropic_model: var("ANTHROPIC_MODEL")
                .unwrap_or_else(|| "claude-3-haiku-20240307".to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            anthropic_base_url: var("ANTHROPIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.anthropic.com/v1".to_string()),
            provider_timeout_secs,
            allowed_origin: var("ALLOWED_ORIGIN")
                .or_else(|| var("VERCEL_URL"))
                .map(|origin| normalize_origin(&origin)),
            otel_service_name: var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| "smart-meal-planner".to_string()),
            otel_exporter_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Upper bound for a whole HTTP request: two provider attempts plus slack.
    pub fn request_timeout(&self) -> Duration {
        self.provider_timeout() * 2 + Duration::from_secs(10)
    }

    /// Every known provider in priority order, configured or not.
    pub fn providers(&self) -> Vec<ProviderSettings> {
        let mut providers = vec![
            ProviderSettings {
                name: OPENAI_PROVIDER,
                endpoint: self.openai_base_url.clone(),
                api_key: self.openai_api_key.clone(),
                model: self.openai_model.clone(),
                priority: 0,
            },
            ProviderSettings {
                name: ANTHROPIC_PROVIDER,
                endpoint: self.anthropic_base_url.clone(),
                api_key: self.anthropic_api_key.clone(),
                model: self.anthropic_model.clone(),
                priority: 1,
            },
        ];
        providers.sort_by_key(|p| p.priority);
        providers
    }
}

/// `VERCEL_URL` carries a bare host; CORS compares full origins.
fn normalize_origin(origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if origin.starts_with("http://") || origin.starts_with("https://") {
        origin.to_string()
    } else {
        format!("https://{origin}")
    }
}
