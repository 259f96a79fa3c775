use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    calculate_points, create_combined_event, delete_combined_event, get_combined_event,
    get_ranking, get_statistics, list_for_competition, update_discipline, validate_performance,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_combined_event))
        .route("/calculate-points", post(calculate_points))
        .route("/validate-performance", post(validate_performance))
        .route("/competition/:competition_id", get(list_for_competition))
        .route("/competition/:competition_id/ranking", get(get_ranking))
        .route("/competition/:competition_id/statistics", get(get_statistics))
        .route("/:id", get(get_combined_event).delete(delete_combined_event))
        .route("/:id/discipline/:discipline", put(update_discipline))
}
