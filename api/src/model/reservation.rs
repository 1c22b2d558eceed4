use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use garde::Validate;
use kernel::model::id::{MemberId, ReservationId, SessionId};
use kernel::model::reservation::{MemberBooking, Reservation, ReservationStatus};
use kernel::model::session::ClassKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub member_id: MemberId,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    #[garde(skip)]
    pub member_id: MemberId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub status: ReservationStatus,
    pub priority: i32,
    pub reserved_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            session_id,
            member_id,
            status,
            priority,
            reserved_at,
            cancelled_at,
        } = value;
        Self {
            reservation_id,
            session_id,
            member_id,
            status,
            priority,
            reserved_at,
            cancelled_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBookingsResponse {
    pub items: Vec<MemberBookingResponse>,
}

impl From<Vec<MemberBooking>> for MemberBookingsResponse {
    fn from(value: Vec<MemberBooking>) -> Self {
        Self {
            items: value.into_iter().map(MemberBookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBookingResponse {
    pub reservation_id: ReservationId,
    pub session_id: SessionId,
    pub session_name: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: ReservationStatus,
    pub priority: i32,
    pub reserved_at: DateTime<Utc>,
}

impl From<MemberBooking> for MemberBookingResponse {
    fn from(value: MemberBooking) -> Self {
        let MemberBooking {
            reservation,
            session_name,
            kind,
            session_date,
            start_time,
        } = value;
        Self {
            reservation_id: reservation.reservation_id,
            session_id: reservation.session_id,
            session_name,
            kind,
            session_date,
            start_time,
            status: reservation.status,
            priority: reservation.priority,
            reserved_at: reservation.reserved_at,
        }
    }
}
