use std::sync::Arc;

use crate::config::Config;
use crate::history::store::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<HistoryStore>,
    #[allow(dead_code)]
    pub config: Config,
}
