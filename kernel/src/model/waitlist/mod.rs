pub mod event;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::id::{MemberId, SessionId, WaitlistEntryId};

/// One member waiting for a seat in one full session.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub entry_id: WaitlistEntryId,
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub priority: i32,
    pub registered_at: DateTime<Utc>,
    /// Set once the member has been promoted; the entry stays behind
    /// as an audit trail and is never considered again.
    pub notified: bool,
}

/// Promotion order: highest priority first, earliest registration
/// breaking ties.
pub fn promotion_order(a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.registered_at.cmp(&b.registered_at))
}
