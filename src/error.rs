//! Errores de los flujos de análisis (libro, personajes, citas).

use thiserror::Error;

use crate::parse::ParseFailure;

/// Ningún error es fatal: cada flujo lo captura en su frontera y lo muestra como aviso.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// La petición fue rechazada o falló el transporte.
    #[error("fallo de red: {0}")]
    NetworkFailure(String),
    /// Respuesta bien formada pero sin el campo esperado.
    #[error("respuesta sin el campo '{0}'")]
    EmptyResult(&'static str),
    #[error("payload no interpretable: {0}")]
    MalformedPayload(#[from] ParseFailure),
    #[error("no hay ningún libro cargado")]
    NoBookLoaded,
}

/// Flujo en el que se produjo el error, para elegir el aviso adecuado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Book,
    Characters,
    Quotes,
}

impl AnalysisError {
    /// Mensaje para el usuario.
    pub fn notice(&self, flow: FlowKind) -> &'static str {
        match (self, flow) {
            (Self::NoBookLoaded, _) => "Primero hay que cargar un libro.",
            (Self::EmptyResult(_), FlowKind::Book) => "No se encontró contenido para ese libro.",
            (Self::NetworkFailure(_), FlowKind::Book) => "No se pudo obtener el libro del backend.",
            (Self::EmptyResult(_), FlowKind::Characters) => "El análisis no devolvió resultado.",
            (Self::NetworkFailure(_), FlowKind::Characters) => "No se pudo analizar el libro.",
            (Self::MalformedPayload(_), FlowKind::Characters) => {
                "No se pudieron interpretar los datos del grafo de personajes."
            }
            (Self::NetworkFailure(_), FlowKind::Quotes) => {
                "No se pudo obtener el sentimiento de las citas."
            }
            (Self::EmptyResult(_) | Self::MalformedPayload(_), FlowKind::Quotes) => {
                "No hay datos de citas para mostrar."
            }
            (Self::MalformedPayload(_), FlowKind::Book) => "El contenido del libro no es válido.",
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}
