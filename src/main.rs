use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use smart_meal_planner::{
    AppState, Config,
    llm::{self, LlmClient},
    routes,
    telemetry::init_telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        otlp_export = telemetry_guard.exporting(),
        "Starting smart-meal-planner"
    );

    let providers = llm::build_providers(&config)?;
    let llm_client = LlmClient::new(providers, config.provider_timeout());

    if llm_client.provider_names().is_empty() {
        tracing::warn!("No AI provider credentials configured, serving mock responses only");
    } else {
        tracing::info!(
            providers = ?llm_client.provider_names(),
            attempt_timeout_secs = config.provider_timeout_secs,
            "LLM client initialized"
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        config: Arc::new(config),
        llm_client: Arc::new(llm_client),
    };
    let app = routes::app(state);

    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry_guard.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
