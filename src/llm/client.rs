use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::mock::mock_response;
use super::{Completion, Provider, ProviderError};
use crate::prompts::RenderedPrompt;
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_FALLBACK_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_TOKEN_USAGE,
    MOCK_RESPONSES,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSource {
    Provider(String),
    Mock,
}

impl ResponseSource {
    pub fn label(&self) -> &str {
        match self {
            ResponseSource::Provider(name) => name,
            ResponseSource::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub text: String,
    pub source: ResponseSource,
}

/// Ordered provider chain with a mock fallback. `resolve` never fails.
pub struct LlmClient {
    providers: Vec<Arc<dyn Provider>>,
    attempt_timeout: Duration,
}

impl LlmClient {
    pub fn new(providers: Vec<Arc<dyn Provider>>, attempt_timeout: Duration) -> Self {
        Self {
            providers,
            attempt_timeout,
        }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub async fn complete_once(
        &self,
        provider: &dyn Provider,
        prompt: &RenderedPrompt,
    ) -> Result<Completion, ProviderError> {
        let provider_name = provider.name();
        let model = provider.model();
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %format!("gen_ai.chat {model}"),
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %model,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            prompt.kind = prompt.kind().as_str(),
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        span.add_event(
            "gen_ai.user.message",
            vec![KeyValue::new("gen_ai.prompt", truncate(prompt.text(), 1000))],
        );

        let result = match tokio::time::timeout(
            self.attempt_timeout,
            provider.complete(prompt.text()).instrument(span.clone()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Transport(format!(
                "timed out after {}s",
                self.attempt_timeout.as_secs_f64()
            ))),
        };

        let duration = start.elapsed().as_secs_f64();
        let provider_kv = KeyValue::new("gen_ai.provider.name", provider_name.to_string());
        let model_kv = KeyValue::new("gen_ai.request.model", model.to_string());

        match result {
            Ok(completion) => {
                span.record("gen_ai.response.model", completion.model.as_str());
                span.record("gen_ai.usage.input_tokens", completion.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", completion.output_tokens as i64);
                if !completion.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        completion.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&completion.text, 2000),
                    )],
                );

                let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(completion.input_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "input"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(completion.output_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "output"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_OPERATION_DURATION.record(duration, &[op_kv, provider_kv, model_kv]);

                Ok(completion)
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("error.type", err.kind());

                GEN_AI_ERROR_COUNT.add(
                    1,
                    &[
                        provider_kv,
                        model_kv,
                        KeyValue::new("error.type", err.kind()),
                    ],
                );

                Err(err)
            }
        }
    }

    /// Tries each provider once, in order, and falls back to the mock
    /// generator when none answers with usable text.
    pub async fn resolve(&self, prompt: &RenderedPrompt) -> Resolution {
        let total = self.providers.len();

        for (index, provider) in self.providers.iter().enumerate() {
            let outcome = self.complete_once(provider.as_ref(), prompt).await;

            match outcome {
                Ok(completion) if !completion.text.trim().is_empty() => {
                    return Resolution {
                        text: completion.text,
                        source: ResponseSource::Provider(provider.name().to_string()),
                    };
                }
                Ok(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        prompt.kind = prompt.kind().as_str(),
                        "Provider returned an empty completion"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        provider = provider.name(),
                        prompt.kind = prompt.kind().as_str(),
                        error.type = err.kind(),
                        error = %err,
                        "Provider call failed"
                    );
                }
            }

            if index + 1 < total {
                GEN_AI_FALLBACK_COUNT.add(
                    1,
                    &[KeyValue::new(
                        "gen_ai.provider.name",
                        provider.name().to_string(),
                    )],
                );
            }
        }

        if total == 0 {
            tracing::info!(
                prompt.kind = prompt.kind().as_str(),
                "No AI provider configured, serving mock response"
            );
        } else {
            tracing::warn!(
                prompt.kind = prompt.kind().as_str(),
                providers = total,
                "All AI providers failed, serving mock response"
            );
        }

        MOCK_RESPONSES.add(1, &[KeyValue::new("prompt.kind", prompt.kind().as_str())]);

        Resolution {
            text: mock_response(prompt.kind()),
            source: ResponseSource::Mock,
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}
