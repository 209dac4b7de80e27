use super::{PromptError, PromptKind, RenderedPrompt, require};

/// Rendered when the user states no dietary restrictions.
pub const NO_RESTRICTIONS: &str = "Nenhuma";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyPreferences {
    pub calories: String,
    pub budget: String,
    pub people: String,
    pub meals_per_day: String,
    pub cuisine: String,
    pub time: String,
    pub restrictions: Option<String>,
}

pub fn weekly_plan(preferences: &WeeklyPreferences) -> Result<RenderedPrompt, PromptError> {
    let calories = require("calories", &preferences.calories)?;
    let budget = require("budget", &preferences.budget)?;
    let people = require("people", &preferences.people)?;
    let meals_per_day = require("mealsPerDay", &preferences.meals_per_day)?;
    let cuisine = require("cuisine", &preferences.cuisine)?;
    let time = require("time", &preferences.time)?;
    let restrictions = preferences
        .restrictions
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(NO_RESTRICTIONS);

    let text = format!(
        "Crie um plano alimentar semanal personalizado com base nas preferências abaixo.\n\n\
        PREFERÊNCIAS DO UTILIZADOR:\n\
        - Calorias diárias: {calories}\n\
        - Orçamento semanal: {budget}€\n\
        - Número de pessoas: {people}\n\
        - Refeições por dia: {meals_per_day}\n\
        - Tipo de cozinha: {cuisine}\n\
        - Tempo disponível: {time}\n\
        - Restrições alimentares: {restrictions}\n\n\
        REQUISITOS OBRIGATÓRIOS:\n\
        1. Cumprir rigorosamente o orçamento indicado\n\
        2. Atingir as calorias diárias alvo com uma margem de ±50 calorias por dia\n\
        3. Garantir variedade nutricional\n\
        4. Respeitar o tempo de preparação disponível\n\
        5. Incluir instruções de confeção detalhadas\n\n\
        Para cada um dos 7 dias indique pequeno-almoço, almoço e jantar (e lanches, se fizer \
        sentido), com ingredientes e quantidades exatas, preparação, calorias e custo de cada \
        refeição.\n\n\
        Inclua ainda a lista de compras agregada por categoria, o resumo nutricional da semana, \
        a percentagem do orçamento utilizada e dicas de preparação e conservação.\n\n\
        Responda apenas com JSON válido, exatamente com esta estrutura:\n\
        {{\n  \"days\": [\n    {{\n      \"day\": \"Segunda-feira\",\n      \
        \"meals\": [\n        {{\"type\": \"...\", \"name\": \"...\", \"ingredients\": [\"...\"], \
        \"instructions\": \"...\", \"calories\": 0, \"cost\": \"...\"}}\n      ],\n      \
        \"total_calories\": 0,\n      \"total_cost\": \"...\"\n    }}\n  ],\n  \
        \"shopping_list\": [\n    {{\"category\": \"...\", \"items\": [\"...\"]}}\n  ],\n  \
        \"nutrition_summary\": {{\n    \"average_calories\": 0,\n    \"protein\": \"...\",\n    \
        \"carbs\": \"...\",\n    \"fat\": \"...\"\n  }},\n  \
        \"budget\": {{\n    \"total\": \"...\",\n    \"used_percentage\": \"...\"\n  }},\n  \
        \"tips\": [\"...\"]\n}}\n"
    );

    Ok(RenderedPrompt::new(PromptKind::WeeklyPlan, text))
}
