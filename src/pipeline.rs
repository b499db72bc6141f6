//! Pipeline completo: respuesta cruda del modelo → extracción → parseo → construcción.

use tracing::{debug, warn};

use crate::{
    extract,
    graph::{build_character_graph, characters_from_values},
    models::{CharacterGraph, Quote},
    parse::{self, ParseFailure},
    quotes::build_quote_list,
};

fn isolate(raw: &str) -> &str {
    match extract::extract_fenced(raw) {
        Some(payload) => {
            debug!("Payload extraído de un bloque ```json ({} bytes)", payload.len());
            payload
        }
        None => {
            debug!("Respuesta sin bloque ```json; se usa tal cual");
            raw
        }
    }
}

/// Normaliza la respuesta del análisis de personajes en un grafo.
pub fn character_graph_from_response(raw: &str) -> Result<CharacterGraph, ParseFailure> {
    let entries = parse::parse_characters(isolate(raw)).inspect_err(|e| {
        warn!("No se pudo interpretar el análisis de personajes: {e}");
    })?;
    let graph = build_character_graph(&characters_from_values(entries));

    let dangling = graph.dangling_endpoints();
    if !dangling.is_empty() {
        warn!("Aristas hacia personajes sin nodo propio: {}", dangling.join(", "));
    }
    Ok(graph)
}

/// Normaliza la respuesta de citas en una lista ordenada.
pub fn quotes_from_response(raw: &str) -> Result<Vec<Quote>, ParseFailure> {
    let records = parse::parse_quotes(isolate(raw)).inspect_err(|e| {
        warn!("No se pudo interpretar la respuesta de citas: {e}");
    })?;
    Ok(build_quote_list(records))
}
