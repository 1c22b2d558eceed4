use chrono::{NaiveDate, NaiveTime};
use kernel::model::id::{MemberId, SessionId};
use kernel::model::report::{AttendanceRow, DateRange, NoShowRow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl From<ReportRangeQuery> for DateRange {
    fn from(value: ReportRangeQuery) -> Self {
        let ReportRangeQuery { from, to } = value;
        DateRange::new(from, to)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoShowRowResponse {
    pub member_id: MemberId,
    pub member_name: String,
    pub session_id: SessionId,
    pub session_name: String,
    pub kind: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
}

impl From<NoShowRow> for NoShowRowResponse {
    fn from(value: NoShowRow) -> Self {
        let NoShowRow {
            member_id,
            member_name,
            session_id,
            session_name,
            kind,
            session_date,
            start_time,
        } = value;
        Self {
            member_id,
            member_name,
            session_id,
            session_name,
            kind: kind.to_string(),
            session_date,
            start_time,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoShowReportResponse {
    pub items: Vec<NoShowRowResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRowResponse {
    pub session_id: SessionId,
    pub session_name: String,
    pub session_date: NaiveDate,
    pub total_reservations: i64,
    pub total_attended: i64,
    pub total_no_shows: i64,
    pub attendance_rate: f64,
}

impl From<AttendanceRow> for AttendanceRowResponse {
    fn from(value: AttendanceRow) -> Self {
        let AttendanceRow {
            session_id,
            session_name,
            session_date,
            total_reservations,
            total_attended,
            total_no_shows,
            attendance_rate,
        } = value;
        Self {
            session_id,
            session_name,
            session_date,
            total_reservations,
            total_attended,
            total_no_shows,
            attendance_rate,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReportResponse {
    pub items: Vec<AttendanceRowResponse>,
}
