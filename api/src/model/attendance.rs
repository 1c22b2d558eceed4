use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::attendance::Attendance;
use kernel::model::id::{AttendanceId, ReservationId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceRequest {
    #[garde(skip)]
    pub attended: bool,
    #[garde(skip)]
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub attendance_id: AttendanceId,
    pub reservation_id: ReservationId,
    pub attended: bool,
    pub recorded_at: DateTime<Utc>,
    pub notes: String,
}

impl From<Attendance> for AttendanceResponse {
    fn from(value: Attendance) -> Self {
        let Attendance {
            attendance_id,
            reservation_id,
            attended,
            recorded_at,
            notes,
        } = value;
        Self {
            attendance_id,
            reservation_id,
            attended,
            recorded_at,
            notes,
        }
    }
}
