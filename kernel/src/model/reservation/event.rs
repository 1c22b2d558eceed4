use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{MemberId, ReservationId, SessionId};
use crate::model::reservation::ReservationStatus;

/// Request to book a seat, as received from the outside.
#[derive(Debug, new)]
pub struct ReserveClass {
    pub member_id: MemberId,
    pub session_id: SessionId,
}

/// Request to cancel an existing reservation.
#[derive(Debug, new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub member_id: MemberId,
}

/// Fully validated reservation record handed to the store inside a
/// session transaction. The session is implied by the transaction.
#[derive(Debug, new)]
pub struct CreateReservation {
    pub member_id: MemberId,
    pub status: ReservationStatus,
    pub priority: i32,
    pub reserved_at: DateTime<Utc>,
}
