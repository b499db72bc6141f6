//! Modelos de dominio: personajes, grafo de interacciones y citas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interacción de un personaje con otro, tal como la devuelve el modelo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Interaction {
    #[serde(default)]
    pub name: String,
    /// Número de interacciones observadas (se espera >= 1).
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    1
}

/// Personaje extraído por el modelo. `name` identifica al personaje dentro de un análisis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "interactsWith")]
    pub interacts_with: Vec<Interaction>,
}

/// Forma del objeto JSON que se pide al modelo en el análisis de personajes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CharacterPayload {
    pub characters: Vec<Character>,
}

/// Nodo del grafo: uno por entrada de personaje.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
}

/// Arista no dirigida con peso >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

/// Cita con hablante, destinatario y sentimiento (copiado literal del modelo).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub target: String,
    /// "positive", "negative" o "neutral"; cualquier otro valor se conserva tal cual.
    #[serde(default)]
    pub sentiment: String,
}

/// Lectura tolerante de un campo de texto: `null` o ausente es cadena vacía y los
/// escalares no textuales se guardan con su representación JSON.
pub(crate) fn lenient_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
