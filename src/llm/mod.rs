pub mod anthropic;
pub mod client;
pub mod mock;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{ANTHROPIC_PROVIDER, Config, OPENAI_PROVIDER};

pub use client::{LlmClient, Resolution, ResponseSource};

/// Sent as the system instruction by every adapter.
pub const SYSTEM_INSTRUCTION: &str = "Você é um especialista em nutrição e culinária portuguesa. \
    Forneça sempre informações precisas, práticas e baseadas em dados reais do mercado português.";

#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("missing API key for {0}")]
    MissingCredential(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("API returned {status}: {message}")]
    NonSuccessStatus { status: String, message: String },
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential(_) => "missing_credential",
            ProviderError::Transport(_) => "transport_failure",
            ProviderError::NonSuccessStatus { .. } => "non_success_status",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Transport(format!("request timed out: {err}"))
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError>;
    fn name(&self) -> &str;
    fn model(&self) -> &str;
}

/// Error body shared by the OpenAI and Anthropic APIs.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turns a non-2xx response into `NonSuccessStatus`, preferring the
/// provider's own error message over the raw body.
async fn status_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.chars().take(500).collect(),
    };
    ProviderError::NonSuccessStatus { status, message }
}

/// Adapters for every provider whose credential is present, in priority order.
pub fn build_providers(config: &Config) -> anyhow::Result<Vec<Arc<dyn Provider>>> {
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let providers = config
        .providers()
        .into_iter()
        .filter(|settings| settings.credential_present())
        .filter_map(|settings| {
            let api_key = settings.api_key.unwrap_or_default();
            let provider: Arc<dyn Provider> = match settings.name {
                OPENAI_PROVIDER => Arc::new(openai::OpenAIProvider::new(
                    http.clone(),
                    &api_key,
                    &settings.endpoint,
                    &settings.model,
                )),
                ANTHROPIC_PROVIDER => Arc::new(anthropic::AnthropicProvider::new(
                    http.clone(),
                    &api_key,
                    &settings.endpoint,
                    &settings.model,
                )),
                other => {
                    tracing::warn!(provider = other, "Unknown provider in configuration");
                    return None;
                }
            };
            Some(provider)
        })
        .collect();

    Ok(providers)
}
