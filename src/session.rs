//! Sesión de análisis: tres flujos independientes (libro, personajes y citas) sobre
//! un [`AnalysisBackend`]. Cada flujo tiene su propia máquina de estados; lo único que
//! comparten es el texto del libro, que no se modifica.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    client::AnalysisBackend,
    error::{AnalysisError, FlowKind},
    flow::{Completion, Flow},
    models::{CharacterGraph, Quote},
    pipeline,
};

/// Resultado de un análisis. Se crea por petición y se reemplaza con la siguiente.
#[derive(Debug, Clone)]
pub struct AnalysisResult<T> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Texto crudo devuelto por el modelo.
    pub raw: String,
    pub value: T,
}

impl<T> AnalysisResult<T> {
    fn new(raw: String, value: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            raw,
            value,
        }
    }
}

pub struct AnalysisSession<B> {
    backend: B,
    book: Mutex<Flow<String>>,
    characters: Mutex<Flow<AnalysisResult<CharacterGraph>>>,
    quotes: Mutex<Flow<AnalysisResult<Vec<Quote>>>>,
}

fn lock<T>(flow: &Mutex<Flow<T>>) -> MutexGuard<'_, Flow<T>> {
    flow.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: AnalysisBackend> AnalysisSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            book: Mutex::default(),
            characters: Mutex::default(),
            quotes: Mutex::default(),
        }
    }

    pub async fn fetch_book(&self, id: &str) -> Completion {
        run(
            &self.book,
            FlowKind::Book,
            "content",
            self.backend.fetch_book(id),
            Ok,
        )
        .await
    }

    pub async fn analyze_characters(&self) -> Completion {
        let Some(text) = self.book_text() else {
            return fail_now(&self.characters, FlowKind::Characters, AnalysisError::NoBookLoaded);
        };
        run(
            &self.characters,
            FlowKind::Characters,
            "result",
            self.backend.analyze(&text),
            |raw| {
                let graph = pipeline::character_graph_from_response(&raw)?;
                Ok(AnalysisResult::new(raw, graph))
            },
        )
        .await
    }

    pub async fn analyze_quotes(&self) -> Completion {
        let Some(text) = self.book_text() else {
            return fail_now(&self.quotes, FlowKind::Quotes, AnalysisError::NoBookLoaded);
        };
        run(
            &self.quotes,
            FlowKind::Quotes,
            "quotes",
            self.backend.quotes(&text),
            |raw| {
                let quotes = pipeline::quotes_from_response(&raw)?;
                Ok(AnalysisResult::new(raw, quotes))
            },
        )
        .await
    }

    /// Texto del último libro descargado con éxito; un fallo al recargar no lo borra.
    pub fn book_text(&self) -> Option<String> {
        lock(&self.book).last_succeeded().cloned()
    }

    pub fn character_analysis(&self) -> Option<AnalysisResult<CharacterGraph>> {
        lock(&self.characters).succeeded().cloned()
    }

    /// Citas del último análisis correcto; vacío si no lo hay.
    pub fn quotes(&self) -> Vec<Quote> {
        lock(&self.quotes)
            .succeeded()
            .map(|result| result.value.clone())
            .unwrap_or_default()
    }

    pub fn is_requesting(&self, kind: FlowKind) -> bool {
        match kind {
            FlowKind::Book => lock(&self.book).is_requesting(),
            FlowKind::Characters => lock(&self.characters).is_requesting(),
            FlowKind::Quotes => lock(&self.quotes).is_requesting(),
        }
    }

    /// Recoge el fallo pendiente del flujo (que vuelve a `Idle`) junto a su aviso.
    pub fn acknowledge(&self, kind: FlowKind) -> Option<(AnalysisError, &'static str)> {
        let failure = match kind {
            FlowKind::Book => lock(&self.book).acknowledge(),
            FlowKind::Characters => lock(&self.characters).acknowledge(),
            FlowKind::Quotes => lock(&self.quotes).acknowledge(),
        };
        failure.map(|err| {
            let notice = err.notice(kind);
            (err, notice)
        })
    }
}

async fn run<T, Fut, F>(
    flow: &Mutex<Flow<T>>,
    kind: FlowKind,
    field: &'static str,
    request: Fut,
    finish: F,
) -> Completion
where
    Fut: Future<Output = Result<Option<String>, AnalysisError>>,
    F: FnOnce(String) -> Result<T, AnalysisError>,
{
    let ticket = lock(flow).begin();
    info!("Flujo {kind:?}: petición en curso");

    let outcome = request
        .await
        .and_then(|value| value.ok_or(AnalysisError::EmptyResult(field)))
        .and_then(finish);
    if let Err(err) = &outcome {
        warn!("Flujo {kind:?} fallido: {err} ({})", err.notice(kind));
    }

    let completion = lock(flow).complete(ticket, outcome);
    if completion == Completion::Superseded {
        warn!("Flujo {kind:?}: resultado descartado, hay una petición más reciente");
    }
    completion
}

fn fail_now<T>(flow: &Mutex<Flow<T>>, kind: FlowKind, err: AnalysisError) -> Completion {
    warn!("Flujo {kind:?} fallido: {err} ({})", err.notice(kind));
    let mut flow = lock(flow);
    let ticket = flow.begin();
    flow.complete(ticket, Err(err))
}
