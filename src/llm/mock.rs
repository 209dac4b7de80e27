//! Canned responses served when no provider can answer.

use serde_json::json;

use crate::prompts::PromptKind;

pub const GENERIC_MOCK_MESSAGE: &str = "Resposta mockada - configure as APIs para integração real";

/// JSON text for `kind`, shaped like the schema its prompt asks for.
pub fn mock_response(kind: PromptKind) -> String {
    let payload = match kind {
        PromptKind::FoodDiscovery => json!({
            "name": "Alimento",
            "description": "Descrição de exemplo do alimento.",
            "curiosities": "Curiosidades de exemplo sobre o alimento.",
            "nutrition": {
                "calories": "100 kcal",
                "protein": "5g",
                "carbs": "15g",
                "fat": "3g",
                "fiber": "2g",
                "vitamins": "Vitamina C, Potássio"
            },
            "price": {
                "current": "2.50€/kg",
                "seasonal": "Entre 2€ e 3€ ao longo do ano",
                "comparison": "Dentro da média da categoria"
            },
            "recipes": [
                {"name": "Receita 1", "description": "Preparação simples", "time": "15 min"},
                {"name": "Receita 2", "description": "Preparação grelhada", "time": "20 min"},
                {"name": "Receita 3", "description": "Preparação salteada", "time": "10 min"}
            ]
        }),
        PromptKind::RecipeDiscovery => json!({
            "name": "Receita",
            "history": "História de exemplo da receita.",
            "ingredients": [
                {"item": "Ingrediente 1", "quantity": "500g", "cost": "2.00€"},
                {"item": "Ingrediente 2", "quantity": "2 unidades", "cost": "1.00€"}
            ],
            "instructions": [
                "Passo 1: Preparar os ingredientes",
                "Passo 2: Cozinhar em lume médio",
                "Passo 3: Servir"
            ],
            "timing": {"prep": "15 min", "cooking": "30 min", "total": "45 min"},
            "difficulty": "fácil",
            "cost": {
                "breakdown": "Ingrediente 1: 2.00€, Ingrediente 2: 1.00€",
                "total": "3.00€",
                "per_person": "0.75€",
                "tips": "Compre os ingredientes da época."
            }
        }),
        PromptKind::WeeklyPlan | PromptKind::HomeIngredients => json!({
            "message": GENERIC_MOCK_MESSAGE
        }),
    };

    payload.to_string()
}
