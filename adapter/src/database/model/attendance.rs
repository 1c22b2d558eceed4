use kernel::model::report::{AttendanceTally, NoShowRow};
use shared::error::AppError;
use sqlx::types::chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct NoShowReportRow {
    pub member_id: Uuid,
    pub member_name: String,
    pub session_id: Uuid,
    pub session_name: String,
    pub kind: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
}

impl TryFrom<NoShowReportRow> for NoShowRow {
    type Error = AppError;

    fn try_from(value: NoShowReportRow) -> Result<Self, Self::Error> {
        let NoShowReportRow {
            member_id,
            member_name,
            session_id,
            session_name,
            kind,
            session_date,
            start_time,
        } = value;
        Ok(NoShowRow {
            member_id: member_id.into(),
            member_name,
            session_id: session_id.into(),
            session_name,
            kind: kind.parse()?,
            session_date,
            start_time,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct AttendanceTallyRow {
    pub session_id: Uuid,
    pub session_name: String,
    pub session_date: NaiveDate,
    pub total_reservations: i64,
    pub total_attended: i64,
    pub total_no_shows: i64,
}

impl From<AttendanceTallyRow> for AttendanceTally {
    fn from(value: AttendanceTallyRow) -> Self {
        let AttendanceTallyRow {
            session_id,
            session_name,
            session_date,
            total_reservations,
            total_attended,
            total_no_shows,
        } = value;
        AttendanceTally {
            session_id: session_id.into(),
            session_name,
            session_date,
            total_reservations,
            total_attended,
            total_no_shows,
        }
    }
}
