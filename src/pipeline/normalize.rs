use serde::Serialize;
use serde_json::{Map, Value};

pub const RAW_RESPONSE_KEY: &str = "raw_response";

/// What to put next to `raw_response` when the provider text is not JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEnvelope {
    pub key: &'static str,
    pub echo: String,
}

impl FallbackEnvelope {
    pub fn new(key: &'static str, echo: impl Into<String>) -> Self {
        Self {
            key,
            echo: echo.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    Structured(Value),
    Envelope(Map<String, Value>),
}

impl NormalizedResponse {
    pub fn is_structured(&self) -> bool {
        matches!(self, NormalizedResponse::Structured(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            NormalizedResponse::Structured(value) => value,
            NormalizedResponse::Envelope(map) => Value::Object(map),
        }
    }
}

/// Strict JSON parse of `raw`; anything unparseable is wrapped, untouched,
/// in the fallback envelope.
pub fn normalize(raw: &str, fallback: &FallbackEnvelope) -> NormalizedResponse {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => NormalizedResponse::Structured(value),
        Err(err) => {
            tracing::debug!(error = %err, "Provider text is not JSON, wrapping raw response");
            let mut envelope = Map::new();
            envelope.insert(fallback.key.to_string(), Value::String(fallback.echo.clone()));
            envelope.insert(RAW_RESPONSE_KEY.to_string(), Value::String(raw.to_string()));
            NormalizedResponse::Envelope(envelope)
        }
    }
}
