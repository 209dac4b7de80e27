pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm_client: Arc<llm::LlmClient>,
}
