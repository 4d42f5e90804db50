use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::screening::matcher::Matcher;
use crate::storage::ScreeningStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job/resume CRUD goes straight to the pool.
    pub db: PgPool,
    pub config: Config,
    pub matcher: Matcher,
    /// Load/save seam for match runs.
    pub store: Arc<dyn ScreeningStore>,
}
