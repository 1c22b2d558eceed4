pub mod event;

use chrono::{DateTime, Utc};

use crate::model::id::{AttendanceId, ReservationId};

/// Check-in outcome for one reservation. At most one record exists
/// per reservation.
#[derive(Debug, Clone)]
pub struct Attendance {
    pub attendance_id: AttendanceId,
    pub reservation_id: ReservationId,
    pub attended: bool,
    pub recorded_at: DateTime<Utc>,
    pub notes: String,
}
