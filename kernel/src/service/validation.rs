use chrono::{DateTime, Utc};

use crate::model::member::Member;
use crate::model::session::ClassSession;

pub(crate) const NO_MEMBER_PROFILE: &str = "no member profile is linked to this account";

/// Everything the booking rules look at, snapshotted once under the
/// session lock so every rule judges the same state.
#[derive(Debug)]
pub struct BookingFacts<'a> {
    pub session: &'a ClassSession,
    pub confirmed_count: i64,
    pub member: Option<&'a Member>,
    pub active_reservation_count: i64,
    pub already_booked: bool,
    pub now: DateTime<Utc>,
    pub max_active_reservations: i64,
}

/// The booking rules, run in declaration order. Every rule gets its
/// say; nothing short-circuits, so the caller can report all reasons
/// at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRule {
    SessionOpen,
    Membership,
    Capacity,
    ActiveLimit,
    Duplicate,
}

impl BookingRule {
    pub const ORDERED: [BookingRule; 5] = [
        BookingRule::SessionOpen,
        BookingRule::Membership,
        BookingRule::Capacity,
        BookingRule::ActiveLimit,
        BookingRule::Duplicate,
    ];

    pub fn check(self, facts: &BookingFacts<'_>) -> Result<(), String> {
        match self {
            BookingRule::SessionOpen => {
                if facts.session.is_bookable(facts.confirmed_count, facts.now) {
                    Ok(())
                } else {
                    Err("this class is not open for booking".into())
                }
            }
            BookingRule::Membership => match facts.member {
                None => Err(NO_MEMBER_PROFILE.into()),
                Some(member) if !member.membership_valid(facts.now.date_naive()) => {
                    Err("your membership is not active".into())
                }
                Some(_) => Ok(()),
            },
            BookingRule::Capacity => {
                if facts.session.seats_remaining(facts.confirmed_count) > 0 {
                    Ok(())
                } else {
                    Err("no seats are available for this class".into())
                }
            }
            BookingRule::ActiveLimit => {
                if facts.active_reservation_count < facts.max_active_reservations {
                    Ok(())
                } else {
                    Err(format!(
                        "you have reached the limit of {} active reservations",
                        facts.max_active_reservations
                    ))
                }
            }
            BookingRule::Duplicate => {
                if facts.already_booked {
                    Err("you already have a reservation for this class".into())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Run every rule and collect the failures, preserving rule order.
pub fn validate_all(facts: &BookingFacts<'_>) -> Vec<String> {
    BookingRule::ORDERED
        .iter()
        .filter_map(|rule| rule.check(facts).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    use crate::model::id::{MemberId, SessionId};
    use crate::model::member::MembershipStatus;
    use crate::model::session::{ClassKind, SessionStatus};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap()
    }

    fn session(capacity: i32) -> ClassSession {
        ClassSession {
            session_id: SessionId::new(),
            name: "Evening Spin".into(),
            description: String::new(),
            kind: ClassKind::Spinning,
            session_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration_minutes: 45,
            capacity,
            instructor_id: None,
            instructor_name: "Sam".into(),
            room_id: None,
            price_cents: 1200,
            status: SessionStatus::Scheduled,
        }
    }

    fn member() -> Member {
        Member {
            member_id: MemberId::new(),
            member_number: "M-0042".into(),
            name: "Grace Hopper".into(),
            joined_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            membership_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            membership_end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            status: MembershipStatus::Active,
        }
    }

    fn facts<'a>(session: &'a ClassSession, member: Option<&'a Member>) -> BookingFacts<'a> {
        BookingFacts {
            session,
            confirmed_count: 0,
            member,
            active_reservation_count: 0,
            already_booked: false,
            now: now(),
            max_active_reservations: 3,
        }
    }

    #[test]
    fn clean_request_passes_every_rule() {
        let session = session(10);
        let member = member();
        assert!(validate_all(&facts(&session, Some(&member))).is_empty());
    }

    #[test]
    fn full_session_fails_open_and_capacity_in_rule_order() {
        let session = session(2);
        let member = member();
        let mut f = facts(&session, Some(&member));
        f.confirmed_count = 2;
        let reasons = validate_all(&f);
        assert_eq!(
            reasons,
            vec![
                "this class is not open for booking".to_string(),
                "no seats are available for this class".to_string(),
            ]
        );
    }

    #[test]
    fn rules_do_not_short_circuit() {
        let mut session = session(2);
        session.status = SessionStatus::Cancelled;
        let mut expired = member();
        expired.status = MembershipStatus::Expired;
        let mut f = facts(&session, Some(&expired));
        f.confirmed_count = 2;
        f.active_reservation_count = 3;
        f.already_booked = true;
        let reasons = validate_all(&f);
        assert_eq!(reasons.len(), 5, "every rule reports its own failure");
    }

    #[test]
    fn missing_member_profile_is_a_rule_failure_not_a_lookup_error() {
        let session = session(10);
        let reasons = validate_all(&facts(&session, None));
        assert_eq!(reasons, vec![NO_MEMBER_PROFILE.to_string()]);
    }

    #[test]
    fn active_limit_is_exclusive_at_the_maximum() {
        let session = session(10);
        let member = member();
        let mut f = facts(&session, Some(&member));
        f.active_reservation_count = 2;
        assert!(validate_all(&f).is_empty());
        f.active_reservation_count = 3;
        assert_eq!(
            validate_all(&f),
            vec!["you have reached the limit of 3 active reservations".to_string()]
        );
    }

    #[test]
    fn duplicate_reservation_is_rejected() {
        let session = session(10);
        let member = member();
        let mut f = facts(&session, Some(&member));
        f.already_booked = true;
        assert_eq!(
            validate_all(&f),
            vec!["you already have a reservation for this class".to_string()]
        );
    }
}
