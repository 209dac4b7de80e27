use super::{PromptError, PromptKind, RenderedPrompt, json_string, require};

pub fn food_discovery(name: &str) -> Result<RenderedPrompt, PromptError> {
    let name = require("search", name)?;
    let name_json = json_string(name);

    let text = format!(
        "Apresente informação detalhada sobre o alimento \"{name}\", organizada nestas secções:\n\n\
        1. DESCRIÇÃO DO ALIMENTO\n\
        - Descrição clara e concisa\n\
        - Origem, características físicas e utilização na cozinha\n\n\
        2. CURIOSIDADES\n\
        - Dois ou três factos históricos ou culturais relevantes\n\n\
        3. VALOR NUTRICIONAL (por 100g)\n\
        - Calorias, proteínas (g), hidratos de carbono (g), gorduras (g), fibra (g)\n\
        - Principais vitaminas e minerais\n\n\
        4. PREÇO DE MERCADO (1kg)\n\
        - Preço atual no mercado português, em euros\n\
        - Variação sazonal, se existir\n\
        - Comparação com produtos semelhantes\n\n\
        5. TRÊS SUGESTÕES DE RECEITAS\n\
        - Nome, preparação resumida em duas ou três linhas e tempo estimado\n\n\
        Use apenas dados reais. Quando não tiver a certeza de um valor, diga-o explicitamente.\n\n\
        Responda apenas com JSON válido, exatamente com esta estrutura:\n\
        {{\n  \"name\": {name_json},\n  \
        \"description\": \"...\",\n  \
        \"curiosities\": \"...\",\n  \
        \"nutrition\": {{\n    \"calories\": \"...\",\n    \"protein\": \"...\",\n    \
        \"carbs\": \"...\",\n    \"fat\": \"...\",\n    \"fiber\": \"...\",\n    \
        \"vitamins\": \"...\"\n  }},\n  \
        \"price\": {{\n    \"current\": \"...\",\n    \"seasonal\": \"...\",\n    \
        \"comparison\": \"...\"\n  }},\n  \
        \"recipes\": [\n    \
        {{\"name\": \"...\", \"description\": \"...\", \"time\": \"...\"}},\n    \
        {{\"name\": \"...\", \"description\": \"...\", \"time\": \"...\"}},\n    \
        {{\"name\": \"...\", \"description\": \"...\", \"time\": \"...\"}}\n  ]\n}}\n"
    );

    Ok(RenderedPrompt::new(PromptKind::FoodDiscovery, text))
}

pub fn recipe_discovery(name: &str) -> Result<RenderedPrompt, PromptError> {
    let name = require("search", name)?;
    let name_json = json_string(name);

    let text = format!(
        "Apresente informação completa sobre a receita \"{name}\", organizada nestas secções:\n\n\
        1. ORIGEM HISTÓRICA\n\
        - História, origem e contexto cultural da receita\n\
        - Como evoluiu ao longo do tempo\n\n\
        2. INGREDIENTES E CONFEÇÃO\n\
        - Lista completa de ingredientes com quantidades precisas\n\
        - Passos de preparação, por ordem\n\
        - Tempo de preparação e de cozedura\n\
        - Dificuldade (fácil, média ou difícil)\n\n\
        3. CUSTO PARA 4 PESSOAS\n\
        - Custo de cada ingrediente\n\
        - Custo total estimado em euros e custo por pessoa\n\
        - Sugestões para poupar\n\n\
        Use a versão autêntica da receita e preços reais do mercado português.\n\n\
        Responda apenas com JSON válido, exatamente com esta estrutura:\n\
        {{\n  \"name\": {name_json},\n  \
        \"history\": \"...\",\n  \
        \"ingredients\": [\n    {{\"item\": \"...\", \"quantity\": \"...\", \"cost\": \"...\"}}\n  ],\n  \
        \"instructions\": [\n    \"Passo 1: ...\",\n    \"Passo 2: ...\"\n  ],\n  \
        \"timing\": {{\n    \"prep\": \"...\",\n    \"cooking\": \"...\",\n    \"total\": \"...\"\n  }},\n  \
        \"difficulty\": \"...\",\n  \
        \"cost\": {{\n    \"breakdown\": \"...\",\n    \"total\": \"...\",\n    \
        \"per_person\": \"...\",\n    \"tips\": \"...\"\n  }}\n}}\n"
    );

    Ok(RenderedPrompt::new(PromptKind::RecipeDiscovery, text))
}
