//! Prompt builders, one per request kind.
//!
//! Every builder is a pure function: the same parameters always render the
//! same text. The rendered text embeds the JSON shape the provider is asked to
//! answer with, and the kind travels alongside it so downstream code never has
//! to inspect the wording.

pub mod discovery;
pub mod pantry;
pub mod planning;

use serde::Serialize;
use thiserror::Error;

pub use discovery::{food_discovery, recipe_discovery};
pub use pantry::{MAX_INGREDIENTS, home_ingredients};
pub use planning::{WeeklyPreferences, weekly_plan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    FoodDiscovery,
    RecipeDiscovery,
    WeeklyPlan,
    HomeIngredients,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::FoodDiscovery => "food_discovery",
            PromptKind::RecipeDiscovery => "recipe_discovery",
            PromptKind::WeeklyPlan => "weekly_plan",
            PromptKind::HomeIngredients => "home_ingredients",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    kind: PromptKind,
    text: String,
}

impl RenderedPrompt {
    pub(crate) fn new(kind: PromptKind, text: String) -> Self {
        Self { kind, text }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Parâmetro \"{0}\" é obrigatório")]
    MissingParameter(&'static str),

    #[error("Lista de ingredientes é obrigatória")]
    NoIngredients,

    #[error("Máximo de {max} ingredientes permitidos (recebidos {given})")]
    TooManyIngredients { max: usize, given: usize },

    #[error("O ingrediente na posição {position} está vazio")]
    BlankIngredient { position: usize },
}

/// Trims a required parameter, rejecting it when nothing is left.
pub(crate) fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, PromptError> {
    let value = value.trim();
    if value.is_empty() {
        Err(PromptError::MissingParameter(name))
    } else {
        Ok(value)
    }
}

/// Quotes a user value for the JSON skeleton embedded in a prompt.
pub(crate) fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
