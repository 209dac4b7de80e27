use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "API do Planejamento Alimentar Inteligente",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "online",
        "endpoints": [
            "POST /api/discover - Descobrir alimentos e receitas",
            "POST /api/plan-week - Planear a semana alimentar",
            "POST /api/home-recipes - Receitas com ingredientes disponíveis"
        ],
        "providers": state.llm_client.provider_names(),
    }))
}
