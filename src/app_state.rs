use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::{config::AppConfig, llm::LlmManager};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub llm_manager: LlmManager,
    /// Cliente HTTP compartido para las descargas de Gutenberg.
    pub http: reqwest::Client,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AppState {
    pub fn new(config: AppConfig, shutdown_tx: oneshot::Sender<()>) -> Self {
        Self {
            llm_manager: LlmManager::from_config(&config),
            config,
            http: reqwest::Client::new(),
            shutdown_sender: Arc::new(Mutex::new(Some(shutdown_tx))),
        }
    }
}
