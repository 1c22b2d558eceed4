pub mod event;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::model::id::{MemberId, ReservationId, SessionId};
use crate::model::session::ClassKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "no_show",
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::NoShow)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "no_show" => Ok(ReservationStatus::NoShow),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown reservation status: {other}"
            ))),
        }
    }
}

/// A member's claim on one seat in one session.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub status: ReservationStatus,
    /// Priority score frozen at creation time; promotions inherit the
    /// score from the waitlist entry they consume.
    pub priority: i32,
    pub reserved_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Cancellable while confirmed and still ahead of the cutoff
    /// (`cutoff_hours` before the session starts, boundary inclusive).
    pub fn cancellable(
        &self,
        session_starts_at: DateTime<Utc>,
        cutoff_hours: i64,
        now: DateTime<Utc>,
    ) -> bool {
        self.status == ReservationStatus::Confirmed
            && now <= session_starts_at - Duration::hours(cutoff_hours)
    }
}

/// A reservation joined with the session it is for, as shown on a
/// member's upcoming-bookings list.
#[derive(Debug, Clone)]
pub struct MemberBooking {
    pub reservation: Reservation,
    pub session_name: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            reservation_id: ReservationId::new(),
            session_id: SessionId::new(),
            member_id: MemberId::new(),
            status,
            priority: 0,
            reserved_at: Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap(),
            cancelled_at: None,
        }
    }

    #[test]
    fn cancellable_exactly_at_the_cutoff() {
        let starts_at = Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap();
        let r = reservation(ReservationStatus::Confirmed);
        let at_cutoff = starts_at - Duration::hours(2);
        assert!(r.cancellable(starts_at, 2, at_cutoff));
        assert!(!r.cancellable(starts_at, 2, at_cutoff + Duration::seconds(1)));
    }

    #[test]
    fn terminal_states_are_cancelled_and_no_show() {
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(ReservationStatus::NoShow.is_terminal());
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
    }

    #[test]
    fn only_confirmed_reservations_are_cancellable() {
        let starts_at = Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap();
        let well_before = starts_at - Duration::days(1);
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Cancelled,
            ReservationStatus::NoShow,
        ] {
            assert!(!reservation(status).cancellable(starts_at, 2, well_before));
        }
    }
}
