use chrono::{NaiveDate, NaiveTime};
use derive_new::new;

use crate::model::id::{InstructorId, RoomId};
use crate::model::session::ClassKind;

#[derive(Debug, new)]
pub struct ScheduleSession {
    pub name: String,
    pub description: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub instructor_id: Option<InstructorId>,
    /// Display name for instructors that have no record of their own.
    /// Ignored when `instructor_id` is set.
    pub instructor_name: Option<String>,
    pub room_id: Option<RoomId>,
    pub price_cents: i64,
}
