//! Descarga de libros de Project Gutenberg probando los formatos de URL conocidos.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

/// URLs candidatas, en el orden en que se prueban.
pub fn candidate_urls(base: &Url, id: u32) -> Vec<String> {
    let base = base.as_str().trim_end_matches('/');
    vec![
        format!("{base}/files/{id}/{id}-0.txt"),
        format!("{base}/files/{id}/{id}.txt"),
        format!("{base}/ebooks/{id}.txt.utf-8"),
    ]
}

/// Recorta a `max_chars` caracteres respetando los límites UTF-8.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Devuelve el texto del libro o `None` si ningún formato conocido lo sirve.
/// Las respuestas HTML (páginas de error de Gutenberg con estado 200) se descartan.
pub async fn fetch_book(
    client: &Client,
    base: &Url,
    id: u32,
    max_chars: usize,
) -> Result<Option<String>> {
    for url in candidate_urls(base, id) {
        let response = client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            debug!("{url} respondió {}", response.status());
            continue;
        }

        let text = response.text().await?;
        if text.starts_with("<!DOCTYPE html>") {
            debug!("{url} devolvió HTML, se prueba el siguiente formato");
            continue;
        }

        info!("Libro {id} descargado desde {url} ({} caracteres)", text.chars().count());
        return Ok(Some(truncate_chars(&text, max_chars).to_string()));
    }

    Ok(None)
}
