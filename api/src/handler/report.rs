use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{attendance::event::RecordAttendance, id::ReservationId};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::{
    attendance::{AttendanceResponse, RecordAttendanceRequest},
    report::{
        AttendanceReportResponse, AttendanceRowResponse, NoShowReportResponse, NoShowRowResponse,
        ReportRangeQuery,
    },
};

pub async fn record_attendance(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RecordAttendanceRequest>,
) -> AppResult<(StatusCode, Json<AttendanceResponse>)> {
    req.validate(&())?;

    let cmd = RecordAttendance::new(reservation_id, req.attended, req.notes);
    registry
        .attendance_service()
        .record(cmd)
        .await
        .map(AttendanceResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

pub async fn no_show_report(
    Query(query): Query<ReportRangeQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NoShowReportResponse>> {
    registry
        .attendance_service()
        .no_shows(query.into())
        .await
        .map(|rows| NoShowReportResponse {
            items: rows.into_iter().map(NoShowRowResponse::from).collect(),
        })
        .map(Json)
}

pub async fn attendance_report(
    Query(query): Query<ReportRangeQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AttendanceReportResponse>> {
    registry
        .attendance_service()
        .attendance_summary(query.into())
        .await
        .map(|rows| AttendanceReportResponse {
            items: rows.into_iter().map(AttendanceRowResponse::from).collect(),
        })
        .map(Json)
}
