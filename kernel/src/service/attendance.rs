use std::sync::Arc;

use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::clock::Clock;
use crate::model::attendance::event::RecordAttendance;
use crate::model::attendance::Attendance;
use crate::model::report::{AttendanceRow, DateRange, NoShowRow};
use crate::repository::attendance::AttendanceRepository;

/// Check-in recording and the attendance-derived reports.
#[derive(new)]
pub struct AttendanceService {
    attendance: Arc<dyn AttendanceRepository>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub async fn record(&self, event: RecordAttendance) -> AppResult<Attendance> {
        let recorded_at = self.clock.now();
        let attendance = self.attendance.record(event, recorded_at).await?;
        tracing::info!(
            attendance_id = %attendance.attendance_id,
            reservation_id = %attendance.reservation_id,
            attended = attendance.attended,
            "attendance recorded"
        );
        Ok(attendance)
    }

    pub async fn no_shows(&self, range: DateRange) -> AppResult<Vec<NoShowRow>> {
        check_range(range)?;
        self.attendance.no_show_rows(range).await
    }

    pub async fn attendance_summary(&self, range: DateRange) -> AppResult<Vec<AttendanceRow>> {
        check_range(range)?;
        let tallies = self.attendance.attendance_tallies(range).await?;
        Ok(tallies.into_iter().map(AttendanceRow::from).collect())
    }
}

fn check_range(range: DateRange) -> AppResult<()> {
    if range.from > range.to {
        return Err(AppError::UnprocessableEntity(
            "date range start must not be after its end".into(),
        ));
    }
    Ok(())
}
