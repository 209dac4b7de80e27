pub mod cors;
pub mod discover;
pub mod health;
pub mod home;
pub mod plan;

use std::any::Any;
use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::AppState;
use crate::error::{AppError, NOT_FOUND_MESSAGE};
use crate::telemetry::http::{HttpMakeSpan, HttpOnResponse};

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let routes = Router::new()
        .route("/api", get(health::health))
        .route("/api/discover", post(discover::discover))
        .route("/api/plan-week", post(plan::plan_week))
        .route("/api/home-recipes", post(home::home_recipes))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic));

    with_request_timeout(routes, config.request_timeout())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors::cors_layer(&config))
        .with_state(state)
}

/// Bounds every request at `limit`; expiry renders as a JSON 408.
fn with_request_timeout<S>(router: Router<S>, limit: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                if err.is::<Elapsed>() {
                    AppError::Timeout(limit)
                } else {
                    AppError::Internal(err.to_string())
                }
            }))
            .timeout(limit),
    )
}

async fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm::mock::GENERIC_MOCK_MESSAGE;
    use crate::llm::{Completion, LlmClient, Provider, ProviderError};

    struct CannedProvider(&'static str);

    #[async_trait::async_trait]
    impl Provider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> Result<Completion, ProviderError> {
            Ok(Completion {
                text: self.0.to_string(),
                model: "canned".to_string(),
                input_tokens: 0,
                output_tokens: 0,
                finish_reason: String::new(),
            })
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn state(providers: Vec<Arc<dyn Provider>>) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "ALLOWED_ORIGIN" => Some("https://planner.example.pt".to_string()),
            _ => None,
        })
        .unwrap();
        AppState {
            config: Arc::new(config),
            llm_client: Arc::new(LlmClient::new(providers, Duration::from_secs(1))),
        }
    }

    fn mock_only() -> Router {
        app(state(vec![]))
    }

    fn answering(text: &'static str) -> Router {
        app(state(vec![Arc::new(CannedProvider(text))]))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_online_without_providers() {
        let (status, body) = send(mock_only(), get("/api")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
        assert_eq!(body["providers"], json!([]));
    }

    #[tokio::test]
    async fn test_health_lists_providers() {
        let (status, body) = send(answering("{}"), get("/api")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["providers"], json!(["canned"]));
    }

    #[tokio::test]
    async fn test_discover_blank_search_is_rejected() {
        let request = post_json("/api/discover", json!({"search": "", "type": "food"}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("search"));
    }

    #[tokio::test]
    async fn test_discover_missing_type_is_rejected() {
        let request = post_json("/api/discover", json!({"search": "figo"}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_discover_unknown_type_is_rejected() {
        let request = post_json("/api/discover", json!({"search": "figo", "type": "drink"}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Tipo deve ser \"food\" ou \"recipe\"");
    }

    #[tokio::test]
    async fn test_discover_food_serves_mock_without_providers() {
        let request = post_json("/api/discover", json!({"search": "figo", "type": "food"}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["recipes"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_discover_prose_answer_echoes_search() {
        let request = post_json("/api/discover", json!({"search": "figo", "type": "recipe"}));
        let (status, body) = send(answering("Não sei responder em JSON."), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["result"],
            json!({"name": "figo", "raw_response": "Não sei responder em JSON."})
        );
    }

    #[tokio::test]
    async fn test_discover_envelope_echoes_trimmed_search() {
        let request = post_json("/api/discover", json!({"search": "  figo \n", "type": "food"}));
        let (status, body) = send(answering("texto livre"), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["result"],
            json!({"name": "figo", "raw_response": "texto livre"})
        );
    }

    #[tokio::test]
    async fn test_discover_structured_answer_passes_through() {
        let request = post_json("/api/discover", json!({"search": "figo", "type": "food"}));
        let (_, body) = send(answering(r#"{"name": "Figo", "extra": [1, 2]}"#), request).await;
        assert_eq!(body["result"], json!({"name": "Figo", "extra": [1, 2]}));
    }

    #[tokio::test]
    async fn test_discover_keeps_provider_key_order() {
        let request = post_json("/api/discover", json!({"search": "figo", "type": "food"}));
        let response = answering(r#"{"name":"Figo","description":"d","curiosities":"c"}"#)
            .oneshot(request)
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"success":true,"result":{"name":"Figo","description":"d","curiosities":"c"}}"#
        );
    }

    #[tokio::test]
    async fn test_plan_week_missing_preferences_rejected() {
        let request = post_json("/api/plan-week", json!({"calories": 2000}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Parâmetro \"budget\" é obrigatório");
    }

    #[tokio::test]
    async fn test_plan_week_serves_plan() {
        let request = post_json(
            "/api/plan-week",
            json!({
                "calories": 2000,
                "budget": 70,
                "people": 2,
                "mealsPerDay": 3,
                "cuisine": "portuguesa",
                "time": "30 min"
            }),
        );
        let (status, body) = send(answering("plano em texto corrido"), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["plan"],
            json!({"message": "Plano gerado com sucesso", "raw_response": "plano em texto corrido"})
        );
    }

    #[tokio::test]
    async fn test_home_recipes_empty_list_rejected() {
        let request = post_json("/api/home-recipes", json!({"ingredients": []}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_home_recipes_missing_list_rejected() {
        let (status, body) = send(mock_only(), post_json("/api/home-recipes", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Lista de ingredientes é obrigatória");

        let request = post_json("/api/home-recipes", json!({"ingredients": "tomate"}));
        let (status, _) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_home_recipes_too_many_rejected() {
        let request = post_json(
            "/api/home-recipes",
            json!({"ingredients": ["a", "b", "c", "d", "e", "f", "g", "h"]}),
        );
        let (status, _) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_home_recipes_mock_without_providers() {
        let request = post_json("/api/home-recipes", json!({"ingredients": ["tomato", "onion"]}));
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["recipes"], json!({"message": GENERIC_MOCK_MESSAGE}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/home-recipes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"ingredients\": [\"tomate\""))
            .unwrap();
        let (status, body) = send(mock_only(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, body) = send(mock_only(), get("/api/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": "Endpoint não encontrado"})
        );
    }

    #[tokio::test]
    async fn test_wrong_method_is_not_found() {
        let (status, body) = send(mock_only(), get("/api/discover")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let response = mock_only().oneshot(get("/api")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_cors_preflight_for_allowed_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/discover")
            .header(header::ORIGIN, "https://planner.example.pt")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = mock_only().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://planner.example.pt"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_unknown_origin() {
        let request = Request::builder()
            .uri("/api")
            .header(header::ORIGIN, "https://elsewhere.example.com")
            .body(Body::empty())
            .unwrap();
        let response = mock_only().oneshot(request).await.unwrap();
        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn test_request_timeout_is_json() {
        async fn slow() -> &'static str {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "tarde"
        }

        let router = with_request_timeout(
            Router::new().route("/slow", axum::routing::get(slow)),
            Duration::from_millis(50),
        );
        let (status, body) = send(router, get("/slow")).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body,
            json!({"success": false, "error": "Tempo limite do pedido excedido"})
        );
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Erro interno do servidor");
        assert_eq!(body["message"], "boom");
    }
}
