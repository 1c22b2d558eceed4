use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::SessionId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::session::{
    AvailabilitiesResponse, AvailabilityResponse, ScheduleSessionRequest, SessionListQuery,
    SessionResponse,
};

pub async fn schedule_session(
    State(registry): State<AppRegistry>,
    Json(req): Json<ScheduleSessionRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    req.validate(&())?;

    registry
        .catalog_service()
        .schedule_session(req.into())
        .await
        .map(SessionResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

pub async fn show_session_list(
    Query(query): Query<SessionListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilitiesResponse>> {
    registry
        .availability_service()
        .search(&query.into())
        .await
        .map(AvailabilitiesResponse::from)
        .map(Json)
}

pub async fn show_session_availability(
    Path(session_id): Path<SessionId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    registry
        .availability_service()
        .snapshot(session_id)
        .await
        .map(AvailabilityResponse::from)
        .map(Json)
}
