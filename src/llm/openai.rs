use serde::{Deserialize, Serialize};

use super::{Completion, Provider, ProviderError, SYSTEM_INSTRUCTION, status_error};
use crate::config::OPENAI_PROVIDER;

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    pub fn new(client: reqwest::Client, api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[async_trait::async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential(OPENAI_PROVIDER.to_string()));
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await?;
        let resp: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Transport(format!("malformed OpenAI response: {e}")))?;

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Transport("OpenAI response had no choices".into()))?;

        let (input_tokens, output_tokens) = match &resp.usage {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
            None => (0, 0),
        };

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            model: resp.model,
            input_tokens,
            output_tokens,
            finish_reason: choice.finish_reason.unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        OPENAI_PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;
    use crate::llm::test_support::spawn;

    /// Echoes the auth header and the request shape back as the completion.
    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let summary = format!(
            "{}|{}|{}|{}|{}",
            auth,
            body["messages"][0]["role"].as_str().unwrap_or_default(),
            body["messages"][0]["content"].as_str().unwrap_or_default() == SYSTEM_INSTRUCTION,
            body["messages"][1]["content"].as_str().unwrap_or_default(),
            body["max_tokens"],
        );
        Json(json!({
            "model": body["model"],
            "choices": [{"message": {"role": "assistant", "content": summary}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34}
        }))
    }

    fn provider(base_url: &str, api_key: &str) -> OpenAIProvider {
        OpenAIProvider::new(reqwest::Client::new(), api_key, base_url, "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request() {
        let base = spawn(Router::new().route("/chat/completions", post(echo))).await;
        let completion = provider(&base, "sk-test").complete("olá").await.unwrap();

        assert_eq!(completion.text, "Bearer sk-test|system|true|olá|2000");
        assert_eq!(completion.model, "gpt-4o-mini");
        assert_eq!(completion.input_tokens, 12);
        assert_eq!(completion.output_tokens, 34);
        assert_eq!(completion.finish_reason, "stop");
    }

    #[tokio::test]
    async fn test_non_success_status_carries_status_text() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "Rate limit reached"}})),
                )
            }),
        );
        let base = spawn(router).await;

        let err = provider(&base, "sk-test").complete("olá").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::NonSuccessStatus {
                status: "429 Too Many Requests".to_string(),
                message: "Rate limit reached".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let err = provider("http://127.0.0.1:1", "  ")
            .complete("olá")
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::MissingCredential("openai".to_string()));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport() {
        let err = provider("http://127.0.0.1:1", "sk-test")
            .complete("olá")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport_failure");
    }

    #[tokio::test]
    async fn test_empty_choices_is_transport() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"model": "gpt-4o-mini", "choices": []})) }),
        );
        let base = spawn(router).await;

        let err = provider(&base, "sk-test").complete("olá").await.unwrap_err();
        assert_eq!(err.kind(), "transport_failure");
    }
}
