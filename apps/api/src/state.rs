use std::sync::Arc;

use crate::store::DocumentStore;
use crate::translation::pipeline::Translator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    /// Shared translation pipeline. Holds no per-request state.
    pub translator: Arc<Translator>,
}
