use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::attendance::event::RecordAttendance;
use crate::model::attendance::Attendance;
use crate::model::report::{AttendanceTally, DateRange, NoShowRow};

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Record the check-in outcome for a reservation. Fails with
    /// `EntityNotFound` for unknown reservations and `DuplicateEntry`
    /// when an outcome was already recorded.
    async fn record(
        &self,
        event: RecordAttendance,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<Attendance>;

    /// Members marked absent for sessions within the range, ordered by
    /// session date and start time.
    async fn no_show_rows(&self, range: DateRange) -> AppResult<Vec<NoShowRow>>;

    /// Per-session reservation and attendance counters for sessions
    /// within the range, ordered by session date and start time.
    async fn attendance_tallies(&self, range: DateRange) -> AppResult<Vec<AttendanceTally>>;
}
