//! Construcción del grafo de interacciones entre personajes.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{lenient_text, Character, CharacterGraph, GraphEdge, GraphNode, Interaction};

/// Convierte las entradas sin tipar en [`Character`] campo a campo. Toda entrada
/// produce un personaje: los campos ausentes, nulos o con tipos inesperados toman un
/// valor por defecto en lugar de descartar la entrada.
pub fn characters_from_values(entries: Vec<Value>) -> Vec<Character> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| character_from_value(idx, entry))
        .collect()
}

fn character_from_value(idx: usize, entry: &Value) -> Character {
    let Value::Object(fields) = entry else {
        warn!("Personaje #{idx} no es un objeto; se usa como nombre");
        return Character {
            name: lenient_text(Some(entry)),
            interacts_with: Vec::new(),
        };
    };

    let interactions = fields
        .get("interacts_with")
        .or_else(|| fields.get("interactsWith"));
    let interacts_with = match interactions {
        Some(Value::Array(others)) => others
            .iter()
            .filter_map(|other| interaction_from_value(idx, other))
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            warn!("Personaje #{idx}: 'interacts_with' no es un array ({other})");
            Vec::new()
        }
    };

    Character {
        name: lenient_text(fields.get("name")),
        interacts_with,
    }
}

fn interaction_from_value(idx: usize, value: &Value) -> Option<Interaction> {
    match value {
        Value::Object(fields) => Some(Interaction {
            name: lenient_text(fields.get("name")),
            count: count_from_value(fields.get("count")),
        }),
        Value::String(name) => Some(Interaction {
            name: name.clone(),
            count: 1,
        }),
        other => {
            warn!("Personaje #{idx}: interacción sin nombre ignorada ({other})");
            None
        }
    }
}

/// Número (los decimales se redondean) o cadena numérica; cualquier otra cosa cuenta como 1.
fn count_from_value(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(round_count)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(round_count))
        }
        _ => None,
    };
    parsed.unwrap_or(1)
}

fn round_count(n: f64) -> i64 {
    if n.is_finite() {
        n.round() as i64
    } else {
        1
    }
}

/// Construye el grafo: un nodo por entrada (en orden, sin deduplicar) y como mucho
/// una arista por par no ordenado de nombres. Si el par aparece varias veces gana la
/// primera aparición, con su `count` como peso.
pub fn build_character_graph(characters: &[Character]) -> CharacterGraph {
    let mut nodes = Vec::with_capacity(characters.len());
    let mut links = Vec::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for character in characters {
        nodes.push(GraphNode {
            id: character.name.clone(),
        });

        for other in &character.interacts_with {
            if seen.insert(pair_key(&character.name, &other.name)) {
                links.push(GraphEdge {
                    source: character.name.clone(),
                    target: other.name.clone(),
                    weight: edge_weight(other.count),
                });
            }
        }
    }

    debug!(
        "Grafo construido: {} nodos, {} aristas",
        nodes.len(),
        links.len()
    );
    CharacterGraph { nodes, links }
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn edge_weight(count: i64) -> u32 {
    count.clamp(1, i64::from(u32::MAX)) as u32
}

impl CharacterGraph {
    /// Extremos de aristas que no tienen nodo propio, en orden de aparición y sin repetir.
    pub fn dangling_endpoints(&self) -> Vec<&str> {
        let known: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut reported = HashSet::new();
        self.links
            .iter()
            .flat_map(|link| [link.source.as_str(), link.target.as_str()])
            .filter(|id| !known.contains(id) && reported.insert(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::character_graph_from_response;
    use serde_json::json;

    fn character(name: &str, others: &[(&str, i64)]) -> Character {
        Character {
            name: name.to_string(),
            interacts_with: others
                .iter()
                .map(|(other, count)| Interaction {
                    name: other.to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    #[test]
    fn reverse_pair_keeps_first_seen_weight() {
        let graph = build_character_graph(&[
            character("Alice", &[("Bob", 2)]),
            character("Bob", &[("Alice", 5)]),
        ]);

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["Alice", "Bob"]);
        assert_eq!(
            graph.links,
            vec![GraphEdge {
                source: "Alice".to_string(),
                target: "Bob".to_string(),
                weight: 2,
            }]
        );
    }

    #[test]
    fn counts_are_not_summed_across_directions() {
        let graph = build_character_graph(&[
            character("A", &[("B", 3)]),
            character("B", &[("A", 5)]),
        ]);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].weight, 3);
    }

    #[test]
    fn duplicate_entries_produce_duplicate_nodes() {
        let graph = build_character_graph(&[
            character("Alice", &[("Bob", 1)]),
            character("Alice", &[("Bob", 4), ("Carol", 1)]),
        ]);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0], graph.nodes[1]);
        assert_eq!(graph.links.len(), 2);
    }

    #[test]
    fn names_containing_separators_do_not_collide() {
        let graph = build_character_graph(&[
            character("a-b", &[("c", 1)]),
            character("a", &[("b-c", 1)]),
        ]);
        assert_eq!(graph.links.len(), 2);
    }

    #[test]
    fn dangling_endpoints_are_kept_and_reported() {
        let graph = build_character_graph(&[character("Alice", &[("Ghost", 1), ("Ghost", 2)])]);
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.dangling_endpoints(), vec!["Ghost"]);
    }

    #[test]
    fn non_positive_counts_become_weight_one() {
        let graph = build_character_graph(&[character("A", &[("B", 0), ("C", -4)])]);
        assert!(graph.links.iter().all(|l| l.weight == 1));
    }

    #[test]
    fn values_with_missing_fields_get_defaults() {
        let characters = characters_from_values(vec![
            json!({"name": "Alice"}),
            json!({"name": "Bob", "interactsWith": [{"name": "Alice"}]}),
            json!({"name": 42}),
            json!({"name": null, "interacts_with": null}),
        ]);
        assert_eq!(characters.len(), 4);
        assert!(characters[0].interacts_with.is_empty());
        assert_eq!(characters[1].interacts_with[0].count, 1);
        assert_eq!(characters[2].name, "42");
        assert_eq!(characters[3].name, "");
    }

    #[test]
    fn odd_counts_keep_nodes_and_edges() {
        let raw = r#"{"characters":[
            {"name":"Alice","interacts_with":[{"name":"Bob","count":2.0}]},
            {"name":"Bob","interacts_with":[{"name":"Carol","count":null}]},
            {"name":"Carol","interacts_with":[{"name":"Dave","count":"3"}, {"name":"Eve","count":"many"}]}
        ]}"#;
        let graph = character_graph_from_response(raw).unwrap();

        assert_eq!(graph.nodes.len(), 3);
        let weights: Vec<(&str, u32)> = graph
            .links
            .iter()
            .map(|l| (l.target.as_str(), l.weight))
            .collect();
        assert_eq!(weights, [("Bob", 2), ("Carol", 1), ("Dave", 3), ("Eve", 1)]);
    }

    #[test]
    fn non_object_entries_still_produce_nodes() {
        let characters = characters_from_values(vec![
            json!("Alice"),
            json!({"name": "Bob", "interacts_with": ["Alice", 7]}),
        ]);
        let graph = build_character_graph(&characters);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].id, "Alice");
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].weight, 1);
    }
}
