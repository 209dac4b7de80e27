use opentelemetry::KeyValue;

use crate::llm::LlmClient;
use crate::prompts::RenderedPrompt;
use crate::telemetry::metrics::UNPARSED_RESPONSES;

use super::normalize::{FallbackEnvelope, NormalizedResponse, normalize};

#[tracing::instrument(
    name = "pipeline prompt",
    skip(llm_client, prompt, fallback),
    fields(
        prompt.kind = prompt.kind().as_str(),
        response.source = tracing::field::Empty,
        response.structured = tracing::field::Empty,
    )
)]
pub async fn run_prompt(
    llm_client: &LlmClient,
    prompt: &RenderedPrompt,
    fallback: &FallbackEnvelope,
) -> NormalizedResponse {
    let resolution = llm_client.resolve(prompt).await;
    let normalized = normalize(&resolution.text, fallback);

    if !normalized.is_structured() {
        UNPARSED_RESPONSES.add(
            1,
            &[
                KeyValue::new("prompt.kind", prompt.kind().as_str()),
                KeyValue::new("response.source", resolution.source.label().to_string()),
            ],
        );
    }

    let span = tracing::Span::current();
    span.record("response.source", resolution.source.label());
    span.record("response.structured", normalized.is_structured());

    normalized
}
