use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline::{FallbackEnvelope, run_prompt};
use crate::prompts::{food_discovery, recipe_discovery};

#[derive(Debug, Deserialize)]
pub struct DiscoverBody {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn discover(
    State(state): State<AppState>,
    payload: Result<Json<DiscoverBody>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = payload?;

    let (Some(search), Some(kind)) = (
        body.search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        body.kind.filter(|k| !k.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Parâmetros \"search\" e \"type\" são obrigatórios".into(),
        ));
    };

    let prompt = match kind.as_str() {
        "food" => food_discovery(&search)?,
        "recipe" => recipe_discovery(&search)?,
        _ => {
            return Err(AppError::Validation(
                "Tipo deve ser \"food\" ou \"recipe\"".into(),
            ));
        }
    };

    let result = run_prompt(
        &state.llm_client,
        &prompt,
        &FallbackEnvelope::new("name", search),
    )
    .await;

    Ok(Json(json!({ "success": true, "result": result })))
}
