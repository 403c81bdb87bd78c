use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `GeminiClient` in production.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}
