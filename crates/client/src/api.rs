use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use storage::dto::combined_event::{
    CalculatePointsRequest, CombinedEventStatistics, CreateCombinedEventRequest,
    DisciplineUpdateResponse, PointsResponse, RankedCombinedEvent, UpdateDisciplineRequest,
    ValidatePerformanceRequest, ValidityResponse,
};
use storage::models::{CombinedEvent, Competition, Discipline, EventType};
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// The server calls the scorecard workflow depends on.
#[async_trait]
pub trait AthleticsApi: Send + Sync {
    async fn list_competitions(&self) -> Result<Vec<Competition>>;

    async fn get_combined_event(&self, id: Uuid) -> Result<CombinedEvent>;

    async fn list_combined_events(&self, competition_id: Uuid) -> Result<Vec<CombinedEvent>>;

    async fn ranking(
        &self,
        competition_id: Uuid,
        event_type: EventType,
    ) -> Result<Vec<RankedCombinedEvent>>;

    async fn statistics(&self, competition_id: Uuid) -> Result<CombinedEventStatistics>;

    async fn create_combined_event(
        &self,
        request: &CreateCombinedEventRequest,
    ) -> Result<CombinedEvent>;

    async fn update_discipline(
        &self,
        id: Uuid,
        discipline: Discipline,
        request: &UpdateDisciplineRequest,
    ) -> Result<DisciplineUpdateResponse>;

    async fn calculate_points(&self, request: &CalculatePointsRequest) -> Result<i32>;

    async fn validate_performance(&self, discipline: Discipline, performance: &str) -> Result<bool>;

    async fn delete_combined_event(&self, id: Uuid) -> Result<()>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Vec<String>,
}

/// HTTP implementation of [`AthleticsApi`].
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .user_agent(concat!("athletics-client/", env!("CARGO_PKG_VERSION")))
                .build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) if body.details.is_empty() => body.error,
            Ok(body) => format!("{}: {}", body.error, body.details.join(", ")),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string(),
        };

        Err(match status {
            StatusCode::NOT_FOUND => ClientError::NotFound,
            s if s.is_client_error() => ClientError::Rejected(message),
            s => ClientError::Server {
                status: s.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl AthleticsApi for ApiClient {
    async fn list_competitions(&self) -> Result<Vec<Competition>> {
        let response = self.client.get(self.url("/competitions")).send().await?;
        Self::parse(response).await
    }

    async fn get_combined_event(&self, id: Uuid) -> Result<CombinedEvent> {
        let response = self
            .client
            .get(self.url(&format!("/combined-events/{id}")))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn list_combined_events(&self, competition_id: Uuid) -> Result<Vec<CombinedEvent>> {
        let response = self
            .client
            .get(self.url(&format!("/combined-events/competition/{competition_id}")))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn ranking(
        &self,
        competition_id: Uuid,
        event_type: EventType,
    ) -> Result<Vec<RankedCombinedEvent>> {
        let response = self
            .client
            .get(self.url(&format!(
                "/combined-events/competition/{competition_id}/ranking"
            )))
            .query(&[("eventType", event_type.as_str())])
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn statistics(&self, competition_id: Uuid) -> Result<CombinedEventStatistics> {
        let response = self
            .client
            .get(self.url(&format!(
                "/combined-events/competition/{competition_id}/statistics"
            )))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn create_combined_event(
        &self,
        request: &CreateCombinedEventRequest,
    ) -> Result<CombinedEvent> {
        let response = self
            .client
            .post(self.url("/combined-events"))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn update_discipline(
        &self,
        id: Uuid,
        discipline: Discipline,
        request: &UpdateDisciplineRequest,
    ) -> Result<DisciplineUpdateResponse> {
        let response = self
            .client
            .put(self.url(&format!(
                "/combined-events/{id}/discipline/{}",
                discipline.code()
            )))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn calculate_points(&self, request: &CalculatePointsRequest) -> Result<i32> {
        let response = self
            .client
            .post(self.url("/combined-events/calculate-points"))
            .json(request)
            .send()
            .await?;
        let body: PointsResponse = Self::parse(response).await?;
        Ok(body.points)
    }

    async fn validate_performance(&self, discipline: Discipline, performance: &str) -> Result<bool> {
        let response = self
            .client
            .post(self.url("/combined-events/validate-performance"))
            .json(&ValidatePerformanceRequest {
                discipline,
                performance: performance.to_string(),
            })
            .send()
            .await?;
        let body: ValidityResponse = Self::parse(response).await?;
        Ok(body.is_valid)
    }

    async fn delete_combined_event(&self, id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/combined-events/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{StatusCode, header};
    use storage::models::Gender;

    /// Serves `body` with `status` for every request and returns the API root.
    async fn stub(status: StatusCode, content_type: &'static str, body: &'static str) -> ApiClient {
        let app = Router::new()
            .fallback(move || async move { (status, [(header::CONTENT_TYPE, content_type)], body) });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        ApiClient::new(&format!("http://{addr}/api/")).unwrap()
    }

    #[tokio::test]
    async fn test_missing_event_is_not_found() {
        let api = stub(
            StatusCode::NOT_FOUND,
            "application/json",
            r#"{"error":"Resource not found"}"#,
        )
        .await;

        let error = api.get_combined_event(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(error, ClientError::NotFound));
    }

    #[tokio::test]
    async fn test_validation_details_are_joined_into_the_message() {
        let api = stub(
            StatusCode::BAD_REQUEST,
            "application/json",
            r#"{"error":"Validation failed","details":["wind: Wind must be within ±20 m/s"]}"#,
        )
        .await;

        let request = UpdateDisciplineRequest {
            performance: "10.85".to_string(),
            wind: None,
        };
        let error = api
            .update_discipline(Uuid::new_v4(), Discipline::Run100m, &request)
            .await
            .unwrap_err();

        match error {
            ClientError::Rejected(message) => {
                assert_eq!(message, "Validation failed: wind: Wind must be within ±20 m/s")
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_gateway_is_a_server_error() {
        let api = stub(
            StatusCode::BAD_GATEWAY,
            "application/json",
            r#"{"error":"Scoring service unavailable"}"#,
        )
        .await;

        let request = CalculatePointsRequest {
            discipline: Discipline::LongJump,
            performance: "7.45".to_string(),
            gender: Gender::Male,
        };
        let error = api.calculate_points(&request).await.unwrap_err();

        match &error {
            ClientError::Server { status, message } => {
                assert_eq!(*status, 502);
                assert_eq!(message, "Scoring service unavailable");
            }
            other => panic!("expected a server error, got {other:?}"),
        }
        assert!(error.user_message().starts_with("Could not reach the server"));
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back_to_the_reason_phrase() {
        let api = stub(StatusCode::UNPROCESSABLE_ENTITY, "text/plain", "nope").await;

        let error = api.delete_combined_event(Uuid::new_v4()).await.unwrap_err();

        match error {
            ClientError::Rejected(message) => assert_eq!(message, "Unprocessable Entity"),
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_body_is_decoded() {
        let api = stub(StatusCode::OK, "application/json", r#"{"isValid":true}"#).await;

        assert!(api.validate_performance(Discipline::HighJump, "2.05").await.unwrap());
    }
}
