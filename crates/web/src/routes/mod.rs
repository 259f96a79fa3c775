use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::features::{athletes, combined_events, competitions};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api/competitions", competitions::routes::routes())
        .nest("/api/athletes", athletes::routes::routes())
        .nest("/api/combined-events", combined_events::routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use storage::Database;
    use storage::models::{Discipline, Gender, Performance};
    use tower::ServiceExt;

    use super::*;
    use crate::scoring::{ScoringError, ScoringService};

    /// Awards one point per hundredth of the performance value.
    struct FlatScorer;

    #[async_trait]
    impl ScoringService for FlatScorer {
        async fn calculate_points(
            &self,
            _discipline: Discipline,
            performance: &Performance,
            _gender: Gender,
        ) -> Result<i32, ScoringError> {
            Ok(performance.value() as i32)
        }
    }

    struct DownScorer;

    #[async_trait]
    impl ScoringService for DownScorer {
        async fn calculate_points(
            &self,
            _discipline: Discipline,
            _performance: &Performance,
            _gender: Gender,
        ) -> Result<i32, ScoringError> {
            Err(ScoringError::Status(503))
        }
    }

    // The pool never connects; these routes must answer without the database.
    fn app(scoring: Arc<dyn ScoringService>) -> Router {
        let db = Database::connect_lazy("postgres://athletics@localhost:1/unused").unwrap();
        router(AppState { db, scoring })
    }

    async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::json!(null));
        (status, json)
    }

    #[tokio::test]
    async fn test_validate_performance_accepts_sprint_time() {
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "POST",
            "/api/combined-events/validate-performance",
            r#"{"discipline": "100M", "performance": "10.85"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isValid"], true);
    }

    #[tokio::test]
    async fn test_validate_performance_rejects_nonsense() {
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "POST",
            "/api/combined-events/validate-performance",
            r#"{"discipline": "100M", "performance": "1:99.x"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isValid"], false);
    }

    #[tokio::test]
    async fn test_calculate_points_uses_scoring_service() {
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "POST",
            "/api/combined-events/calculate-points",
            r#"{"discipline": "LJ", "performance": "7,45", "gender": "MALE"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["points"], 745);
    }

    #[tokio::test]
    async fn test_calculate_points_rejects_invalid_performance() {
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "POST",
            "/api/combined-events/calculate-points",
            r#"{"discipline": "SP", "performance": "far", "gender": "FEMALE"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("SP"));
    }

    #[tokio::test]
    async fn test_scoring_outage_is_bad_gateway() {
        let (status, _) = send(
            app(Arc::new(DownScorer)),
            "POST",
            "/api/combined-events/calculate-points",
            r#"{"discipline": "100M", "performance": "11.02", "gender": "MALE"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_discipline() {
        let uri = format!("/api/combined-events/{}/discipline/400MH", uuid::Uuid::new_v4());
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "PUT",
            &uri,
            r#"{"performance": "52.10"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("400MH"));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_performance_before_storage() {
        let uri = format!("/api/combined-events/{}/discipline/100M", uuid::Uuid::new_v4());
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "PUT",
            &uri,
            r#"{"performance": "2.10", "wind": 1.2}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("plausible"));
    }

    #[tokio::test]
    async fn test_malformed_performance_is_rejected_even_for_unknown_event() {
        let uri = format!("/api/combined-events/{}/discipline/800M", uuid::Uuid::new_v4());
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "PUT",
            &uri,
            r#"{"performance": "two minutes"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_rejects_gale_wind() {
        let uri = format!("/api/combined-events/{}/discipline/LJ", uuid::Uuid::new_v4());
        let (status, json) = send(
            app(Arc::new(FlatScorer)),
            "PUT",
            &uri,
            r#"{"performance": "7.10", "wind": 35.0}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Validation failed");
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let (status, _) = send(
            app(Arc::new(FlatScorer)),
            "GET",
            "/api/combined-events/not-a-uuid",
            "",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
