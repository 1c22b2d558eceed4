use derive_new::new;

use crate::model::id::ReservationId;

#[derive(Debug, new)]
pub struct RecordAttendance {
    pub reservation_id: ReservationId,
    pub attended: bool,
    pub notes: String,
}
