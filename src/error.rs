use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::prompts::PromptError;

pub const NOT_FOUND_MESSAGE: &str = "Endpoint não encontrado";
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";
pub const REQUEST_TIMEOUT_MESSAGE: &str = "Tempo limite do pedido excedido";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!(
            "Corpo do pedido inválido: {}",
            rejection.body_text()
        ))
    }
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mut body) = match &self {
            AppError::Validation(msg) => {
                tracing::debug!(error = %msg, "Rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "success": false, "error": msg }),
                )
            }
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": msg }),
            ),
            AppError::Timeout(limit) => {
                tracing::warn!(limit_ms = limit.as_millis() as u64, "Request timed out");
                (
                    StatusCode::REQUEST_TIMEOUT,
                    json!({ "success": false, "error": REQUEST_TIMEOUT_MESSAGE }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": INTERNAL_ERROR_MESSAGE,
                        "message": msg,
                    }),
                )
            }
        };

        if let Some(trace_id) = get_trace_id() {
            body["trace_id"] = json!(trace_id);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
