//! Cliente del contrato HTTP del analizador (`/api/book`, `/api/analyze`, `/api/quotes`).

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Frontera petición/respuesta con el backend. Cada llamada devuelve el campo esperado
/// o `None` si la respuesta llegó bien formada pero sin él.
pub trait AnalysisBackend {
    fn fetch_book(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<String>, AnalysisError>> + Send;

    fn analyze(&self, text: &str)
        -> impl Future<Output = Result<Option<String>, AnalysisError>> + Send;

    fn quotes(&self, text: &str)
        -> impl Future<Output = Result<Option<String>, AnalysisError>> + Send;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct TextReq<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct BookResp {
    content: Option<String>,
}

#[derive(Deserialize)]
struct AnalyzeResp {
    result: Option<String>,
}

#[derive(Deserialize)]
struct QuotesResp {
    quotes: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_text<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        text: &str,
    ) -> Result<T, AnalysisError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&TextReq { text })
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(response)
    }
}

/// Un campo vacío cuenta como ausente.
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

impl AnalysisBackend for HttpBackend {
    async fn fetch_book(&self, id: &str) -> Result<Option<String>, AnalysisError> {
        let response = self
            .client
            .get(format!("{}/api/book", self.base_url))
            .query(&[("id", id)])
            .send()
            .await?
            .error_for_status()?
            .json::<BookResp>()
            .await?;
        Ok(non_empty(response.content))
    }

    async fn analyze(&self, text: &str) -> Result<Option<String>, AnalysisError> {
        let response: AnalyzeResp = self.post_text("/api/analyze", text).await?;
        Ok(non_empty(response.result))
    }

    async fn quotes(&self, text: &str) -> Result<Option<String>, AnalysisError> {
        let response: QuotesResp = self.post_text("/api/quotes", text).await?;
        Ok(non_empty(response.quotes))
    }
}
