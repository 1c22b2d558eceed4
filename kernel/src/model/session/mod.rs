pub mod event;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::model::id::{InstructorId, RoomId, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Yoga,
    Pilates,
    Spinning,
    Crossfit,
    Zumba,
    Boxing,
    Strength,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Yoga => "yoga",
            ClassKind::Pilates => "pilates",
            ClassKind::Spinning => "spinning",
            ClassKind::Crossfit => "crossfit",
            ClassKind::Zumba => "zumba",
            ClassKind::Boxing => "boxing",
            ClassKind::Strength => "strength",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yoga" => Ok(ClassKind::Yoga),
            "pilates" => Ok(ClassKind::Pilates),
            "spinning" => Ok(ClassKind::Spinning),
            "crossfit" => Ok(ClassKind::Crossfit),
            "zumba" => Ok(ClassKind::Zumba),
            "boxing" => Ok(ClassKind::Boxing),
            "strength" => Ok(ClassKind::Strength),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown class kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown session status: {other}"
            ))),
        }
    }
}

/// A single occurrence of a class on the calendar.
///
/// Availability is derived, never stored: every question about free
/// seats takes the count of confirmed reservations as an input, so the
/// answer is only as fresh as that count. Authoritative checks re-count
/// under the session lock.
#[derive(Debug, Clone)]
pub struct ClassSession {
    pub session_id: SessionId,
    pub name: String,
    pub description: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub instructor_id: Option<InstructorId>,
    /// Denormalized display name, kept even when no instructor record is linked.
    pub instructor_name: String,
    pub room_id: Option<RoomId>,
    pub price_cents: i64,
    pub status: SessionStatus,
}

impl ClassSession {
    pub fn starts_at(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.session_date.and_time(self.start_time))
    }

    /// End of the session; may roll past midnight into the next day.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at() + Duration::minutes(self.duration_minutes as i64)
    }

    /// Free seats, clamped at zero even if stored data ever overshoots.
    pub fn seats_remaining(&self, confirmed_count: i64) -> i64 {
        (self.capacity as i64 - confirmed_count).max(0)
    }

    pub fn is_full(&self, confirmed_count: i64) -> bool {
        self.seats_remaining(confirmed_count) == 0
    }

    /// Bookable means scheduled, not yet started and not full.
    pub fn is_bookable(&self, confirmed_count: i64, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Scheduled
            && self.starts_at() > now
            && !self.is_full(confirmed_count)
    }

    /// Half-open interval test: back-to-back sessions do not overlap.
    pub fn overlaps(&self, other: &ClassSession) -> bool {
        self.starts_at() < other.ends_at() && other.starts_at() < self.ends_at()
    }
}

/// A session together with its confirmed reservation count, read in one go.
#[derive(Debug, Clone)]
pub struct SessionOccupancy {
    pub session: ClassSession,
    pub confirmed_count: i64,
}

/// Read-model row for browsing the timetable.
#[derive(Debug, Clone)]
pub struct SessionAvailability {
    pub session_id: SessionId,
    pub name: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub instructor_name: String,
    pub price_cents: i64,
    pub capacity: i32,
    pub seats_remaining: i64,
    pub is_full: bool,
    pub is_bookable: bool,
}

impl SessionAvailability {
    pub fn project(session: &ClassSession, confirmed_count: i64, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session.session_id,
            name: session.name.clone(),
            kind: session.kind,
            session_date: session.session_date,
            start_time: session.start_time,
            duration_minutes: session.duration_minutes,
            instructor_name: session.instructor_name.clone(),
            price_cents: session.price_cents,
            capacity: session.capacity,
            seats_remaining: session.seats_remaining(confirmed_count),
            is_full: session.is_full(confirmed_count),
            is_bookable: session.is_bookable(confirmed_count, now),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub kind: Option<ClassKind>,
    pub date: Option<NaiveDate>,
    pub instructor_id: Option<InstructorId>,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn session(date: (i32, u32, u32), time: (u32, u32), duration: i32, capacity: i32) -> ClassSession {
        ClassSession {
            session_id: SessionId::new(),
            name: "Morning Yoga".into(),
            description: String::new(),
            kind: ClassKind::Yoga,
            session_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            duration_minutes: duration,
            capacity,
            instructor_id: None,
            instructor_name: "Jo".into(),
            room_id: None,
            price_cents: 1500,
            status: SessionStatus::Scheduled,
        }
    }

    #[test]
    fn seats_remaining_clamps_at_zero() {
        let s = session((2026, 9, 1), (9, 0), 60, 10);
        assert_eq!(s.seats_remaining(3), 7);
        assert_eq!(s.seats_remaining(10), 0);
        assert_eq!(s.seats_remaining(12), 0);
    }

    #[test]
    fn session_ending_past_midnight_rolls_to_next_day() {
        let s = session((2026, 9, 1), (23, 30), 60, 10);
        let end = s.ends_at();
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
        assert_eq!(end.time(), NaiveTime::from_hms_opt(0, 30, 0).unwrap());
    }

    #[test]
    fn bookable_requires_scheduled_future_and_free_seats() {
        let s = session((2026, 9, 1), (9, 0), 60, 2);
        let before = s.starts_at() - Duration::hours(1);
        let after = s.starts_at() + Duration::minutes(1);
        assert!(s.is_bookable(1, before));
        assert!(!s.is_bookable(2, before), "full session is not bookable");
        assert!(!s.is_bookable(0, after), "started session is not bookable");

        let mut cancelled = s.clone();
        cancelled.status = SessionStatus::Cancelled;
        assert!(!cancelled.is_bookable(0, before));
    }

    #[test]
    fn back_to_back_sessions_do_not_overlap() {
        let first = session((2026, 9, 1), (9, 0), 60, 10);
        let second = session((2026, 9, 1), (10, 0), 60, 10);
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn contained_session_overlaps() {
        let long = session((2026, 9, 1), (9, 0), 120, 10);
        let short = session((2026, 9, 1), (9, 30), 30, 10);
        assert!(long.overlaps(&short));
        assert!(short.overlaps(&long));
    }

    #[test]
    fn overlap_crossing_midnight_is_detected() {
        let late = session((2026, 9, 1), (23, 30), 60, 10);
        let early = session((2026, 9, 2), (0, 15), 45, 10);
        assert!(late.overlaps(&early));
    }

    proptest! {
        #[test]
        fn seats_remaining_stays_within_capacity(capacity in 1i32..=500, confirmed in 0i64..=1000) {
            let s = session((2026, 9, 1), (9, 0), 60, capacity);
            let free = s.seats_remaining(confirmed);
            prop_assert!(free >= 0);
            prop_assert!(free <= capacity as i64);
            prop_assert_eq!(free == 0, s.is_full(confirmed));
        }
    }
}
