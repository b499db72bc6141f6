//! API HTTP: libros de Gutenberg, llamadas al LLM y normalización de sus respuestas.

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    app_state::AppState,
    gutenberg,
    models::Quote,
    parse::ParseFailure,
    pipeline,
    presenter::{node_label, GraphPresenter, GraphView, JsonGraphPresenter, SentimentClass},
};

type ApiError = (StatusCode, Json<serde_json::Value>);

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct BookQuery {
    id: u32,
}

#[derive(Serialize)]
pub struct BookResponse {
    book_id: u32,
    content: String,
}

#[derive(Deserialize)]
pub struct TextPayload {
    text: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    result: String,
}

#[derive(Serialize, Deserialize)]
pub struct QuotesText {
    quotes: String,
}

#[derive(Deserialize)]
pub struct RawAnalysis {
    result: String,
}

/// Cita con su categoría visual ya resuelta para el frontend.
#[derive(Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    quote: Quote,
    class: SentimentClass,
    color: &'static str,
}

#[derive(Serialize)]
pub struct QuoteListResponse {
    quotes: Vec<QuoteView>,
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/book", get(book_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/quotes", post(quotes_handler))
        .route("/api/character-graph", post(character_graph_handler))
        .route("/api/quote-list", post(quote_list_handler))
        .route("/api/normalize/characters", post(normalize_characters_handler))
        .route("/api/normalize/quotes", post(normalize_quotes_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn book_handler(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<BookResponse>, ApiError> {
    let fetched = gutenberg::fetch_book(
        &state.http,
        &state.config.gutenberg_base_url,
        query.id,
        state.config.book_max_chars,
    )
    .await;

    match fetched {
        Ok(Some(content)) => Ok(Json(BookResponse {
            book_id: query.id,
            content,
        })),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Book not found in known formats."})),
        )),
        Err(e) => {
            error!("Error descargando el libro {}: {}", query.id, e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": format!("Error al descargar el libro: {}", e)})),
            ))
        }
    }
}

#[axum::debug_handler]
async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let result = state
        .llm_manager
        .analyze_characters(&payload.text)
        .await
        .map_err(|e| llm_error("análisis de personajes", e))?;
    Ok(Json(AnalyzeResponse { result }))
}

#[axum::debug_handler]
async fn quotes_handler(
    State(state): State<AppState>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<QuotesText>, ApiError> {
    let quotes = state
        .llm_manager
        .extract_quotes(&payload.text)
        .await
        .map_err(|e| llm_error("sentimiento de citas", e))?;
    Ok(Json(QuotesText { quotes }))
}

#[axum::debug_handler]
async fn character_graph_handler(
    State(state): State<AppState>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<GraphView>, ApiError> {
    let raw = state
        .llm_manager
        .analyze_characters(&payload.text)
        .await
        .map_err(|e| llm_error("análisis de personajes", e))?;
    present_characters(&raw)
}

#[axum::debug_handler]
async fn quote_list_handler(
    State(state): State<AppState>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<QuoteListResponse>, ApiError> {
    let raw = state
        .llm_manager
        .extract_quotes(&payload.text)
        .await
        .map_err(|e| llm_error("sentimiento de citas", e))?;
    present_quotes(&raw)
}

#[axum::debug_handler]
async fn normalize_characters_handler(
    Json(payload): Json<RawAnalysis>,
) -> Result<Json<GraphView>, ApiError> {
    present_characters(&payload.result)
}

#[axum::debug_handler]
async fn normalize_quotes_handler(
    Json(payload): Json<QuotesText>,
) -> Result<Json<QuoteListResponse>, ApiError> {
    present_quotes(&payload.quotes)
}

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    if let Ok(mut sender) = state.shutdown_sender.lock() {
        if let Some(sender) = sender.take() {
            let _ = sender.send(());
        }
    }
    StatusCode::OK
}

// --- Utilidades ---

fn present_characters(raw: &str) -> Result<Json<GraphView>, ApiError> {
    let graph = pipeline::character_graph_from_response(raw)
        .map_err(|e| unprocessable("No se pudieron interpretar los datos del grafo de personajes.", e))?;
    Ok(Json(JsonGraphPresenter.present(&graph, &node_label)))
}

fn present_quotes(raw: &str) -> Result<Json<QuoteListResponse>, ApiError> {
    let quotes = pipeline::quotes_from_response(raw)
        .map_err(|e| unprocessable("No hay datos de citas para mostrar.", e))?;
    let quotes = quotes
        .into_iter()
        .map(|quote| {
            let class = SentimentClass::classify(&quote.sentiment);
            QuoteView {
                quote,
                class,
                color: class.color(),
            }
        })
        .collect();
    Ok(Json(QuoteListResponse { quotes }))
}

fn unprocessable(notice: &str, failure: ParseFailure) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"error": notice, "detail": failure.to_string()})),
    )
}

fn llm_error(what: &str, err: anyhow::Error) -> ApiError {
    error!("Error del LLM en {}: {}", what, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": format!("Error del LLM en {}: {}", what, err)})),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, LlmProvider};
    use axum::{body::Body, http::Request};
    use tokio::sync::oneshot;
    use tower::ServiceExt;
    use url::Url;

    fn test_state() -> (AppState, oneshot::Receiver<()>) {
        let config = AppConfig {
            server_addr: "127.0.0.1:0".to_string(),
            frontend_dir: "frontend".into(),
            open_browser: false,
            gutenberg_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            book_max_chars: 100,
            llm_provider: LlmProvider::Groq,
            llm_chat_model: "test-model".to_string(),
            analysis_chunk_chars: 50,
        };
        let (tx, rx) = oneshot::channel();
        (AppState::new(config, tx), rx)
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let (state, _rx) = test_state();
        let response = create_router(state)
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn normalizes_fenced_character_analysis() {
        let result = "```json\n{\"characters\": [\
            {\"name\": \"Alice\", \"interacts_with\": [{\"name\": \"Bob\", \"count\": 2}]},\
            {\"name\": \"Bob\", \"interacts_with\": [{\"name\": \"Alice\", \"count\": 5}]}\
            ]}\n```";
        let (status, body) = post_json("/api/normalize/characters", json!({ "result": result })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(body["links"].as_array().unwrap().len(), 1);
        assert_eq!(body["links"][0]["weight"], 2);
    }

    #[tokio::test]
    async fn prose_quotes_are_unprocessable() {
        let (status, body) =
            post_json("/api/normalize/quotes", json!({ "quotes": "no quotes here" })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "No hay datos de citas para mostrar.");
    }

    #[tokio::test]
    async fn quotes_carry_sentiment_class() {
        let quotes = r#"[{"quote":"a","speaker":"X","target":"Y","sentiment":"positive"},
                         {"quote":"b","speaker":"Y","target":"X","sentiment":"wistful"}]"#;
        let (status, body) = post_json("/api/normalize/quotes", json!({ "quotes": quotes })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quotes"][0]["quote"], "a");
        assert_eq!(body["quotes"][0]["class"], "positive");
        assert_eq!(body["quotes"][1]["sentiment"], "wistful");
        assert_eq!(body["quotes"][1]["class"], "neutral");
    }

    #[tokio::test]
    async fn shutdown_signals_the_server() {
        let (state, rx) = test_state();
        let response = create_router(state)
            .oneshot(Request::post("/api/shutdown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.await.is_ok());
    }
}
