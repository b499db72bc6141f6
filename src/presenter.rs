//! Frontera con la capa de presentación (motor de grafo de fuerzas en el frontend).

use serde::Serialize;

use crate::models::{CharacterGraph, GraphNode};

/// Consumidor del grafo construido. Recibe la función de etiqueta que se invoca por nodo.
pub trait GraphPresenter {
    type Output;

    fn present(&self, graph: &CharacterGraph, label: &dyn Fn(&GraphNode) -> String)
        -> Self::Output;
}

/// Etiqueta por defecto: el propio id del personaje.
pub fn node_label(node: &GraphNode) -> String {
    node.id.clone()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    /// Extremo de arista sin entrada propia en el análisis.
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub source: String,
    pub target: String,
    pub weight: u32,
    pub width: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
}

/// Genera la vista JSON que consume el frontend. Los extremos colgantes se añaden como
/// nodos implícitos para que el motor de fuerzas no falle al resolver las aristas.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGraphPresenter;

impl GraphPresenter for JsonGraphPresenter {
    type Output = GraphView;

    fn present(&self, graph: &CharacterGraph, label: &dyn Fn(&GraphNode) -> String) -> GraphView {
        let mut nodes: Vec<NodeView> = graph
            .nodes
            .iter()
            .map(|node| NodeView {
                id: node.id.clone(),
                label: label(node),
                implicit: false,
            })
            .collect();

        for id in graph.dangling_endpoints() {
            let node = GraphNode { id: id.to_string() };
            nodes.push(NodeView {
                label: label(&node),
                id: node.id,
                implicit: true,
            });
        }

        let links = graph
            .links
            .iter()
            .map(|link| LinkView {
                source: link.source.clone(),
                target: link.target.clone(),
                weight: link.weight,
                width: link.weight.max(1),
            })
            .collect();

        GraphView { nodes, links }
    }
}

/// Categoría visual de un sentimiento. Sólo los valores exactos reconocidos tienen
/// tratamiento propio; el resto cae en `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl SentimentClass {
    pub fn classify(sentiment: &str) -> Self {
        match sentiment {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Positive => "#4ade80",
            Self::Negative => "#f87171",
            Self::Neutral => "#fde047",
        }
    }
}
