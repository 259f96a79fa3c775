use axum::{Router, routing::get};

use super::handlers::{create_competition, delete_competition, get_competition, list_competitions};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_competitions).post(create_competition))
        .route("/:id", get(get_competition).delete(delete_competition))
}
