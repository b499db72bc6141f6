//! Parseo estricto del payload aislado por [`crate::extract`].
//!
//! Nunca lanza errores fatales: devuelve el valor parseado o un [`ParseFailure`].
//! La validación de campos concretos queda para los constructores de grafo y citas.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseFailure {
    /// El texto no empieza por `[`; ni siquiera se intenta parsear.
    #[error("la respuesta no contiene un array JSON")]
    NotAnArray,
    /// JSON válido pero con una forma distinta a la esperada.
    #[error("forma inesperada: se esperaba {0}")]
    UnexpectedShape(&'static str),
    #[error("JSON mal formado: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parsea el objeto `{"characters": [...]}` y devuelve las entradas sin tipar.
pub fn parse_characters(text: &str) -> Result<Vec<Value>, ParseFailure> {
    let value: Value = serde_json::from_str(text.trim())?;
    match value {
        Value::Object(mut map) => match map.remove("characters") {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Err(ParseFailure::UnexpectedShape(
                "un objeto con un array \"characters\"",
            )),
        },
        _ => Err(ParseFailure::UnexpectedShape(
            "un objeto con un array \"characters\"",
        )),
    }
}

/// Parsea un array de citas. Si el texto recortado no empieza por `[` se devuelve
/// [`ParseFailure::NotAnArray`] sin pasar la prosa al parser.
pub fn parse_quotes(text: &str) -> Result<Vec<Value>, ParseFailure> {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') {
        return Err(ParseFailure::NotAnArray);
    }
    match serde_json::from_str(trimmed)? {
        Value::Array(records) => Ok(records),
        _ => Err(ParseFailure::UnexpectedShape("un array de citas")),
    }
}
