use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::SessionId, waitlist::event::JoinWaitlist};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::{
    reservation::ReservationResponse,
    waitlist::{JoinWaitlistRequest, WaitlistEntryResponse},
};

pub async fn join_waitlist(
    Path(session_id): Path<SessionId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<JoinWaitlistRequest>,
) -> AppResult<(StatusCode, Json<WaitlistEntryResponse>)> {
    req.validate(&())?;

    let cmd = JoinWaitlist::new(req.member_id, session_id);
    registry
        .waitlist_service()
        .join(cmd)
        .await
        .map(WaitlistEntryResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

/// Manually promotes the head of the waitlist when a seat is free.
/// Promotion also runs automatically after each cancellation; this
/// endpoint covers seats freed by other means.
pub async fn promote_waitlist(
    Path(session_id): Path<SessionId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Option<ReservationResponse>>> {
    registry
        .waitlist_service()
        .promote_next(session_id)
        .await
        .map(|promoted| promoted.map(ReservationResponse::from))
        .map(Json)
}
