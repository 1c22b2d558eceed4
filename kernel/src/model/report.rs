use chrono::{NaiveDate, NaiveTime};
use derive_new::new;

use crate::model::id::{MemberId, SessionId};
use crate::model::session::ClassKind;

/// Inclusive date range for reporting queries.
#[derive(Debug, Clone, Copy, new)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// A member who held a confirmed reservation but was marked absent.
#[derive(Debug, Clone)]
pub struct NoShowRow {
    pub member_id: MemberId,
    pub member_name: String,
    pub session_id: SessionId,
    pub session_name: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Raw per-session counters as they come out of the store.
#[derive(Debug, Clone)]
pub struct AttendanceTally {
    pub session_id: SessionId,
    pub session_name: String,
    pub session_date: NaiveDate,
    pub total_reservations: i64,
    pub total_attended: i64,
    pub total_no_shows: i64,
}

/// Per-session attendance summary with the derived rate.
#[derive(Debug, Clone)]
pub struct AttendanceRow {
    pub session_id: SessionId,
    pub session_name: String,
    pub session_date: NaiveDate,
    pub total_reservations: i64,
    pub total_attended: i64,
    pub total_no_shows: i64,
    /// Attended per confirmed reservation, as a percentage rounded to
    /// two decimals. Zero when the session had no reservations.
    pub attendance_rate: f64,
}

impl From<AttendanceTally> for AttendanceRow {
    fn from(tally: AttendanceTally) -> Self {
        let attendance_rate = attendance_rate(tally.total_attended, tally.total_reservations);
        Self {
            session_id: tally.session_id,
            session_name: tally.session_name,
            session_date: tally.session_date,
            total_reservations: tally.total_reservations,
            total_attended: tally.total_attended,
            total_no_shows: tally.total_no_shows,
            attendance_rate,
        }
    }
}

fn attendance_rate(attended: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = attended as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
