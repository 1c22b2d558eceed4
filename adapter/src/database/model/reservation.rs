use kernel::model::reservation::{MemberBooking, Reservation};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: Uuid,
    pub session_id: Uuid,
    pub member_id: Uuid,
    pub status: String,
    pub priority: i32,
    pub reserved_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            session_id,
            member_id,
            status,
            priority,
            reserved_at,
            cancelled_at,
        } = value;
        Ok(Reservation {
            reservation_id: reservation_id.into(),
            session_id: session_id.into(),
            member_id: member_id.into(),
            status: status.parse()?,
            priority,
            reserved_at,
            cancelled_at,
        })
    }
}

/// Reservation joined with its session, for the member's upcoming list.
#[derive(sqlx::FromRow)]
pub struct MemberBookingRow {
    #[sqlx(flatten)]
    pub reservation: ReservationRow,
    pub session_name: String,
    pub kind: String,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
}

impl TryFrom<MemberBookingRow> for MemberBooking {
    type Error = AppError;

    fn try_from(value: MemberBookingRow) -> Result<Self, Self::Error> {
        let MemberBookingRow {
            reservation,
            session_name,
            kind,
            session_date,
            start_time,
        } = value;
        Ok(MemberBooking {
            reservation: reservation.try_into()?,
            session_name,
            kind: kind.parse()?,
            session_date,
            start_time,
        })
    }
}
