use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pipeline::{FallbackEnvelope, run_prompt};
use crate::prompts::home_ingredients;

pub const RECIPES_ENVELOPE_MESSAGE: &str = "Receitas geradas com sucesso";

#[derive(Debug, Deserialize)]
pub struct HomeRecipesBody {
    pub ingredients: Option<Value>,
}

fn ingredient_list(value: Option<Value>) -> AppResult<Vec<String>> {
    let Some(Value::Array(items)) = value else {
        return Err(AppError::Validation(
            "Lista de ingredientes é obrigatória".into(),
        ));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            _ => Err(AppError::Validation(
                "Os ingredientes devem ser texto".into(),
            )),
        })
        .collect()
}

pub async fn home_recipes(
    State(state): State<AppState>,
    payload: Result<Json<HomeRecipesBody>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = payload?;
    let ingredients = ingredient_list(body.ingredients)?;
    let prompt = home_ingredients(&ingredients)?;

    let recipes = run_prompt(
        &state.llm_client,
        &prompt,
        &FallbackEnvelope::new("message", RECIPES_ENVELOPE_MESSAGE),
    )
    .await;

    Ok(Json(json!({ "success": true, "recipes": recipes })))
}
