use kernel::model::session::{ClassSession, SessionOccupancy};
use shared::error::AppError;
use sqlx::types::chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct SessionRow {
    pub session_id: Uuid,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub instructor_id: Option<Uuid>,
    pub instructor_name: String,
    pub room_id: Option<Uuid>,
    pub price_cents: i64,
    pub status: String,
}

impl TryFrom<SessionRow> for ClassSession {
    type Error = AppError;

    fn try_from(value: SessionRow) -> Result<Self, Self::Error> {
        let SessionRow {
            session_id,
            name,
            description,
            kind,
            session_date,
            start_time,
            duration_minutes,
            capacity,
            instructor_id,
            instructor_name,
            room_id,
            price_cents,
            status,
        } = value;
        Ok(ClassSession {
            session_id: session_id.into(),
            name,
            description,
            kind: kind.parse()?,
            session_date,
            start_time,
            duration_minutes,
            capacity,
            instructor_id: instructor_id.map(Into::into),
            instructor_name,
            room_id: room_id.map(Into::into),
            price_cents,
            status: status.parse()?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct SessionOccupancyRow {
    #[sqlx(flatten)]
    pub session: SessionRow,
    pub confirmed_count: i64,
}

impl TryFrom<SessionOccupancyRow> for SessionOccupancy {
    type Error = AppError;

    fn try_from(value: SessionOccupancyRow) -> Result<Self, Self::Error> {
        Ok(SessionOccupancy {
            session: value.session.try_into()?,
            confirmed_count: value.confirmed_count,
        })
    }
}
