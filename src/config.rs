//! Carga y gestión de configuración de la aplicación (servidor, Gutenberg y LLM).

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAI,
    Groq,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "groq" => Ok(Self::Groq),
            other => Err(anyhow!("Proveedor LLM no soportado: {other}")),
        }
    }

    fn default_chat_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Groq => "gemma2-9b-it",
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    pub frontend_dir: PathBuf,
    pub open_browser: bool,

    pub gutenberg_base_url: Url,
    /// Máximo de caracteres que se conservan de cada libro.
    pub book_max_chars: usize,

    pub llm_provider: LlmProvider,
    pub llm_chat_model: String,
    /// Tamaño del fragmento central del libro que se envía al modelo.
    pub analysis_chunk_chars: usize,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        let frontend_dir = env::var("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("frontend"));
        let open_browser = env::var("OPEN_BROWSER")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        let gutenberg_raw = env::var("GUTENBERG_BASE_URL")
            .unwrap_or_else(|_| "https://www.gutenberg.org".to_string());
        let gutenberg_base_url = Url::parse(&gutenberg_raw)
            .with_context(|| format!("GUTENBERG_BASE_URL no es una URL válida: {gutenberg_raw}"))?;
        let book_max_chars = parse_usize_var("BOOK_MAX_CHARS", 100_000)?;

        let llm_provider_str = env::var("LLM_PROVIDER").unwrap_or_else(|_| "groq".to_string());
        let llm_provider = LlmProvider::from_str(&llm_provider_str)?;
        let llm_chat_model = env::var("LLM_CHAT_MODEL")
            .unwrap_or_else(|_| llm_provider.default_chat_model().to_string());
        let analysis_chunk_chars = parse_usize_var("ANALYSIS_CHUNK_CHARS", 5_000)?;

        Ok(Self {
            server_addr,
            frontend_dir,
            open_browser,
            gutenberg_base_url,
            book_max_chars,
            llm_provider,
            llm_chat_model,
            analysis_chunk_chars,
        })
    }
}

fn parse_usize_var(name: &str, default: usize) -> Result<usize> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} debe ser un entero positivo, no '{raw}'")),
        Err(_) => Ok(default),
    }
}
