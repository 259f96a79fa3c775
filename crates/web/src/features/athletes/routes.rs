use axum::{Router, routing::get};

use super::handlers::{create_athlete, delete_athlete, get_athlete, list_athletes};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_athletes).post(create_athlete))
        .route("/:id", get(get_athlete).delete(delete_athlete))
}
