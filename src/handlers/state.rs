//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::inference::{HttpInference, InferenceProvider};
use crate::store::{ArticleStore, TodoStore};

/// Central state for the server: the stores plus the injectable inference
/// provider. Tests substitute a deterministic stub provider.
pub struct AppStateInner {
    pub config: ServerConfig,
    pub todos: TodoStore,
    pub articles: ArticleStore,
    pub inference: Arc<dyn InferenceProvider>,
}

impl AppStateInner {
    /// Production wiring: hosted model client configured from the
    /// environment
    pub fn new(config: ServerConfig) -> Self {
        let inference = Arc::new(HttpInference::new(&config.llm));
        Self::with_provider(config, inference)
    }

    /// Explicit provider wiring, used by tests
    pub fn with_provider(config: ServerConfig, inference: Arc<dyn InferenceProvider>) -> Self {
        Self {
            config,
            todos: TodoStore::new(),
            articles: ArticleStore::new(),
            inference,
        }
    }
}
