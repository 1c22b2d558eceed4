use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{MemberId, ReservationId, SessionId},
    reservation::event::{CancelReservation, ReserveClass},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::reservation::{
    CancelReservationRequest, CreateReservationRequest, MemberBookingsResponse,
    ReservationResponse,
};

pub async fn reserve_session(
    Path(session_id): Path<SessionId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let cmd = ReserveClass::new(req.member_id, session_id);
    registry
        .booking_service()
        .create_reservation(cmd)
        .await
        .map(ReservationResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CancelReservationRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let cmd = CancelReservation::new(reservation_id, req.member_id);
    registry
        .booking_service()
        .cancel_reservation(cmd)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

pub async fn show_member_reservations(
    Path(member_id): Path<MemberId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MemberBookingsResponse>> {
    registry
        .booking_service()
        .reservations_for_member(member_id)
        .await
        .map(MemberBookingsResponse::from)
        .map(Json)
}
