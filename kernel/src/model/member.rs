use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::model::id::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Expired,
    Suspended,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MembershipStatus::Active),
            "expired" => Ok(MembershipStatus::Expired),
            "suspended" => Ok(MembershipStatus::Suspended),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown membership status: {other}"
            ))),
        }
    }
}

/// A gym member. Enrollment and billing live elsewhere; the booking
/// core only reads members to validate requests and rank waitlists.
#[derive(Debug, Clone)]
pub struct Member {
    pub member_id: MemberId,
    pub member_number: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
    pub membership_start: NaiveDate,
    pub membership_end: NaiveDate,
    pub status: MembershipStatus,
}

impl Member {
    /// A membership is usable while it is active and not past its end date.
    pub fn membership_valid(&self, today: NaiveDate) -> bool {
        self.status == MembershipStatus::Active && self.membership_end >= today
    }

    /// Waitlist priority: one point per day of tenure plus a configured
    /// weight per prior confirmed reservation. Higher wins.
    pub fn priority_score(&self, now: DateTime<Utc>, prior_confirmed: i64, weight: i32) -> i32 {
        let tenure_days = (now.date_naive() - self.joined_at.date_naive()).num_days().max(0);
        tenure_days as i32 + prior_confirmed as i32 * weight
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;

    fn member(status: MembershipStatus, end: NaiveDate) -> Member {
        Member {
            member_id: MemberId::new(),
            member_number: "M-0001".into(),
            name: "Ada Lovelace".into(),
            joined_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
            membership_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            membership_end: end,
            status,
        }
    }

    #[test]
    fn membership_is_valid_through_its_end_date() {
        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let m = member(MembershipStatus::Active, end);
        assert!(m.membership_valid(end));
        assert!(!m.membership_valid(end.succ_opt().unwrap()));
    }

    #[test]
    fn suspended_membership_is_never_valid() {
        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let m = member(MembershipStatus::Suspended, end);
        assert!(!m.membership_valid(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
    }

    #[test]
    fn priority_adds_tenure_days_and_weighted_history() {
        let m = member(
            MembershipStatus::Active,
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        );
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap();
        // 30 days of tenure, 4 prior reservations at weight 10.
        assert_eq!(m.priority_score(now, 4, 10), 70);
    }

    #[test]
    fn priority_tenure_never_goes_negative() {
        let m = member(
            MembershipStatus::Active,
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        );
        let before_joining = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        assert_eq!(m.priority_score(before_joining, 0, 10), 0);
    }

    proptest! {
        #[test]
        fn priority_grows_with_tenure_and_history(
            tenure_days in 0i64..=3650,
            prior in 0i64..=200,
        ) {
            let m = member(
                MembershipStatus::Active,
                NaiveDate::from_ymd_opt(2036, 12, 31).unwrap(),
            );
            let now = m.joined_at + Duration::days(tenure_days);
            let score = m.priority_score(now, prior, 10);
            prop_assert!(m.priority_score(now + Duration::days(1), prior, 10) >= score);
            prop_assert!(m.priority_score(now, prior + 1, 10) > score);
        }
    }
}
