use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::combined_event::{
    CalculatePointsRequest, CombinedEventStatistics, CreateCombinedEventRequest,
    DisciplineUpdateResponse, PointsResponse, RankedCombinedEvent, RankingQuery,
    UpdateDisciplineRequest, ValidatePerformanceRequest, ValidityResponse,
};
use storage::models::CombinedEvent;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/combined-events",
    request_body = CreateCombinedEventRequest,
    responses(
        (status = 201, description = "Combined event created with unscored disciplines", body = CombinedEvent),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Athlete or competition not found"),
        (status = 409, description = "Athlete already entered in this event")
    ),
    tag = "combined-events"
)]
pub async fn create_combined_event(
    State(state): State<AppState>,
    Json(req): Json<CreateCombinedEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::create_combined_event(state.db.pool(), &req).await?;
    tracing::info!(
        combined_event_id = %event.id,
        event_type = %event.event_type,
        athlete_id = %event.athlete_id,
        "Created combined event"
    );

    Ok((StatusCode::CREATED, Json(event)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/combined-events/{id}",
    params(
        ("id" = Uuid, Path, description = "Combined event ID")
    ),
    responses(
        (status = 200, description = "Combined event with results in day order", body = CombinedEvent),
        (status = 404, description = "Combined event not found")
    ),
    tag = "combined-events"
)]
pub async fn get_combined_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_combined_event(state.db.pool(), id).await?;

    Ok(Json(event).into_response())
}

#[utoipa::path(
    get,
    path = "/api/combined-events/competition/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Combined events of the competition", body = Vec<CombinedEvent>),
        (status = 404, description = "Competition not found")
    ),
    tag = "combined-events"
)]
pub async fn list_for_competition(
    State(state): State<AppState>,
    Path(competition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let events = services::list_for_competition(state.db.pool(), competition_id).await?;

    Ok(Json(events).into_response())
}

#[utoipa::path(
    get,
    path = "/api/combined-events/competition/{competition_id}/ranking",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID"),
        RankingQuery
    ),
    responses(
        (status = 200, description = "Ranked combined events", body = Vec<RankedCombinedEvent>),
        (status = 400, description = "Unknown event type"),
        (status = 404, description = "Competition not found")
    ),
    tag = "combined-events"
)]
pub async fn get_ranking(
    State(state): State<AppState>,
    Path(competition_id): Path<Uuid>,
    Query(query): Query<RankingQuery>,
) -> Result<Response, WebError> {
    let ranking =
        services::get_ranking(state.db.pool(), competition_id, query.event_type).await?;

    Ok(Json(ranking).into_response())
}

#[utoipa::path(
    get,
    path = "/api/combined-events/competition/{competition_id}/statistics",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Aggregate counts and scores", body = CombinedEventStatistics),
        (status = 404, description = "Competition not found")
    ),
    tag = "combined-events"
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(competition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let stats = services::get_statistics(state.db.pool(), competition_id).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    put,
    path = "/api/combined-events/{id}/discipline/{discipline}",
    params(
        ("id" = Uuid, Path, description = "Combined event ID"),
        ("discipline" = String, Path, description = "Discipline code, e.g. 100M or LJ")
    ),
    request_body = UpdateDisciplineRequest,
    responses(
        (status = 200, description = "Discipline scored; totals recomputed", body = DisciplineUpdateResponse),
        (status = 400, description = "Invalid performance or discipline"),
        (status = 404, description = "Combined event not found"),
        (status = 502, description = "Scoring service unavailable")
    ),
    tag = "combined-events"
)]
pub async fn update_discipline(
    State(state): State<AppState>,
    Path((id, discipline)): Path<(Uuid, String)>,
    Json(req): Json<UpdateDisciplineRequest>,
) -> Result<Response, WebError> {
    let discipline = services::parse_discipline(&discipline)?;
    req.validate()?;

    let response = services::update_discipline(
        state.db.pool(),
        state.scoring.as_ref(),
        id,
        discipline,
        &req,
    )
    .await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/combined-events/calculate-points",
    request_body = CalculatePointsRequest,
    responses(
        (status = 200, description = "Points for the performance", body = PointsResponse),
        (status = 400, description = "Invalid performance"),
        (status = 502, description = "Scoring service unavailable")
    ),
    tag = "combined-events"
)]
pub async fn calculate_points(
    State(state): State<AppState>,
    Json(req): Json<CalculatePointsRequest>,
) -> Result<Response, WebError> {
    let points = services::calculate_points(state.scoring.as_ref(), &req).await?;

    Ok(Json(PointsResponse { points }).into_response())
}

#[utoipa::path(
    post,
    path = "/api/combined-events/validate-performance",
    request_body = ValidatePerformanceRequest,
    responses(
        (status = 200, description = "Whether the performance is legal for the discipline", body = ValidityResponse)
    ),
    tag = "combined-events"
)]
pub async fn validate_performance(Json(req): Json<ValidatePerformanceRequest>) -> Response {
    let is_valid = services::validate_performance(req.discipline, &req.performance);

    Json(ValidityResponse { is_valid }).into_response()
}

#[utoipa::path(
    delete,
    path = "/api/combined-events/{id}",
    params(
        ("id" = Uuid, Path, description = "Combined event ID")
    ),
    responses(
        (status = 204, description = "Combined event and its results deleted"),
        (status = 404, description = "Combined event not found")
    ),
    tag = "combined-events"
)]
pub async fn delete_combined_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_combined_event(state.db.pool(), id).await?;
    tracing::info!(combined_event_id = %id, "Deleted combined event");

    Ok(StatusCode::NO_CONTENT.into_response())
}
