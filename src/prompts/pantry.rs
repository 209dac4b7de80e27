use super::{PromptError, PromptKind, RenderedPrompt};

pub const MAX_INGREDIENTS: usize = 7;

pub fn home_ingredients(ingredients: &[String]) -> Result<RenderedPrompt, PromptError> {
    if ingredients.is_empty() {
        return Err(PromptError::NoIngredients);
    }
    if ingredients.len() > MAX_INGREDIENTS {
        return Err(PromptError::TooManyIngredients {
            max: MAX_INGREDIENTS,
            given: ingredients.len(),
        });
    }

    let mut names = Vec::with_capacity(ingredients.len());
    for (index, ingredient) in ingredients.iter().enumerate() {
        let name = ingredient.trim();
        if name.is_empty() {
            return Err(PromptError::BlankIngredient {
                position: index + 1,
            });
        }
        names.push(name);
    }
    let list = names.join(", ");

    let text = format!(
        "Ingredientes disponíveis em casa: {list}\n\n\
        Crie EXATAMENTE 3 receitas criativas e práticas que usem estes ingredientes.\n\n\
        Para cada receita indique:\n\
        1. Um nome apelativo e descritivo\n\
        2. A lista completa de ingredientes, incluindo temperos básicos\n\
        3. Instruções passo a passo\n\
        4. Tempo de preparação\n\
        5. Número de porções\n\
        6. Custo estimado para 4 pessoas\n\
        7. Dicas ou variações\n\n\
        REGRAS:\n\
        - Use todos os ingredientes indicados sempre que possível\n\
        - Se um ingrediente não encaixar numa receita, proponha uma variação\n\
        - Pode sugerir ingredientes básicos adicionais quando necessário\n\
        - Privilegie receitas práticas e saborosas\n\n\
        Responda apenas com JSON válido, exatamente com esta estrutura:\n\
        {{\n  \"recipes\": [\n    {{\n      \"name\": \"...\",\n      \
        \"ingredients\": [\"...\"],\n      \
        \"instructions\": [\"Passo 1: ...\"],\n      \
        \"time\": \"...\",\n      \
        \"servings\": \"...\",\n      \
        \"cost\": \"...\",\n      \
        \"tips\": \"...\"\n    }}\n  ]\n}}\n"
    );

    Ok(RenderedPrompt::new(PromptKind::HomeIngredients, text))
}
