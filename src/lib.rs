//! Analizador de libros de Project Gutenberg: pide al LLM el grafo de personajes y
//! las citas con sentimiento, y normaliza sus respuestas en estructuras validadas.

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod flow;
pub mod graph;
pub mod gutenberg;
pub mod llm;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod presenter;
pub mod quotes;
pub mod session;

pub use config::AppConfig;
