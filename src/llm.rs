//! Abstracción sobre Rig para pedir al LLM el análisis de personajes y de citas.
//! Se devuelve siempre el texto crudo del modelo; la normalización vive en `pipeline`.

use anyhow::Result;
use rig::completion::Prompt;
use schemars::{schema_for, JsonSchema};
use tracing::{debug, info};

use crate::config::{AppConfig, LlmProvider};
use crate::models::{CharacterPayload, Quote};

const CHARACTERS_TEMPERATURE: f64 = 0.3;
const QUOTES_TEMPERATURE: f64 = 0.5;

const CHARACTERS_PREAMBLE: &str = r#"
Given the following book text, extract a list of characters and their interactions.
Return a JSON object like this:
{
  "characters": [
    {
      "name": "Character Name",
      "interacts_with": [
        { "name": "Another Character", "count": 3 }
      ]
    }
  ]
}
"#;

const QUOTES_PREAMBLE: &str = r#"
From the following book text, extract 3 important quotes between characters and describe the sentiment of each.
Return JSON in this format:
[
  {
    "quote": "...",
    "sentiment": "positive",
    "speaker": "Character A",
    "target": "Character B"
  }
]
"#;

/// Gestor del modelo de chat.
#[derive(Debug, Clone)]
pub struct LlmManager {
    pub provider: LlmProvider,
    pub chat_model: String,
    pub chunk_chars: usize,
}

impl LlmManager {
    /// Construye el manager a partir de la configuración.
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            provider: cfg.llm_provider.clone(),
            chat_model: cfg.llm_chat_model.clone(),
            chunk_chars: cfg.analysis_chunk_chars,
        }
    }

    /// Pide al modelo los personajes y sus interacciones.
    pub async fn analyze_characters(&self, text: &str) -> Result<String> {
        let preamble = with_schema::<CharacterPayload>(CHARACTERS_PREAMBLE)?;
        let chunk = middle_chunk(text, self.chunk_chars);
        info!("Analizando personajes sobre {} caracteres", chunk.chars().count());
        self.complete(&preamble, chunk, CHARACTERS_TEMPERATURE).await
    }

    /// Pide al modelo tres citas relevantes con su sentimiento.
    pub async fn extract_quotes(&self, text: &str) -> Result<String> {
        let preamble = with_schema::<Vec<Quote>>(QUOTES_PREAMBLE)?;
        let chunk = middle_chunk(text, self.chunk_chars);
        info!("Extrayendo citas sobre {} caracteres", chunk.chars().count());
        self.complete(&preamble, chunk, QUOTES_TEMPERATURE).await
    }

    async fn complete(&self, preamble: &str, text: &str, temperature: f64) -> Result<String> {
        use rig::client::CompletionClient as _;

        let prompt = format!("TEXT:\n{text}");
        let answer = match self.provider {
            LlmProvider::OpenAI => {
                let client = rig::providers::openai::Client::from_env();
                let agent = client
                    .agent(&self.chat_model)
                    .preamble(preamble)
                    .temperature(temperature)
                    .build();
                agent.prompt(prompt.as_str()).await?
            }
            LlmProvider::Groq => {
                let client = rig::providers::groq::Client::from_env();
                let agent = client
                    .agent(&self.chat_model)
                    .preamble(preamble)
                    .temperature(temperature)
                    .build();
                agent.prompt(prompt.as_str()).await?
            }
        };

        debug!("Respuesta del modelo ({} bytes)", answer.len());
        Ok(answer)
    }
}

fn with_schema<T: JsonSchema>(preamble: &str) -> Result<String> {
    let schema = serde_json::to_string_pretty(&schema_for!(T))?;
    Ok(format!(
        "{preamble}\nThe output must validate against this JSON Schema:\n{schema}\n"
    ))
}

/// Fragmento central de `length` caracteres; el texto completo si es más corto.
pub fn middle_chunk(text: &str, length: usize) -> &str {
    let total = text.chars().count();
    if total <= length {
        return text;
    }
    let start_char = (total - length) / 2;
    let mut indices = text.char_indices().map(|(i, _)| i);
    let start = indices.nth(start_char).unwrap_or(text.len());
    let end = text
        .char_indices()
        .map(|(i, _)| i)
        .nth(start_char + length)
        .unwrap_or(text.len());
    &text[start..end]
}
