use std::sync::Arc;

use crate::recommendation::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; the models inside are read-only.
    pub pipeline: Arc<Pipeline>,
}
