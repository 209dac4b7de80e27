use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::AppResult;
use crate::pipeline::{FallbackEnvelope, run_prompt};
use crate::prompts::{WeeklyPreferences, weekly_plan};

pub const PLAN_ENVELOPE_MESSAGE: &str = "Plano gerado com sucesso";

/// Preferences arrive from HTML forms, so numbers and strings are both
/// accepted for every field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWeekBody {
    pub calories: Option<Value>,
    pub budget: Option<Value>,
    pub people: Option<Value>,
    pub meals_per_day: Option<Value>,
    pub cuisine: Option<Value>,
    pub time: Option<Value>,
    pub restrictions: Option<Value>,
}

impl From<PlanWeekBody> for WeeklyPreferences {
    fn from(body: PlanWeekBody) -> Self {
        WeeklyPreferences {
            calories: scalar_text(body.calories.as_ref()).unwrap_or_default(),
            budget: scalar_text(body.budget.as_ref()).unwrap_or_default(),
            people: scalar_text(body.people.as_ref()).unwrap_or_default(),
            meals_per_day: scalar_text(body.meals_per_day.as_ref()).unwrap_or_default(),
            cuisine: scalar_text(body.cuisine.as_ref()).unwrap_or_default(),
            time: scalar_text(body.time.as_ref()).unwrap_or_default(),
            restrictions: scalar_text(body.restrictions.as_ref()),
        }
    }
}

/// Text form of a form value. Arrays of scalars are joined with ", ";
/// null and objects count as absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| scalar_text(Some(item)))
                .filter(|part| !part.trim().is_empty())
                .collect();
            Some(parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

pub async fn plan_week(
    State(state): State<AppState>,
    payload: Result<Json<PlanWeekBody>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = payload?;
    let preferences = WeeklyPreferences::from(body);
    let prompt = weekly_plan(&preferences)?;

    let plan = run_prompt(
        &state.llm_client,
        &prompt,
        &FallbackEnvelope::new("message", PLAN_ENVELOPE_MESSAGE),
    )
    .await;

    Ok(Json(json!({ "success": true, "plan": plan })))
}
