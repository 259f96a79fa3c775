use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;

use crate::scoring::ScoringService;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub scoring: Arc<dyn ScoringService>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
