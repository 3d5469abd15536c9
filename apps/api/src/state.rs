use std::sync::Arc;

use crate::flows::FlowRegistry;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. `LlmClient` in production.
    pub model: Arc<dyn CompletionModel>,
    /// The compiled flows, built once at startup.
    pub flows: Arc<FlowRegistry>,
}
