use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{MemberId, SessionId};

/// Request to join the waitlist of a full session.
#[derive(Debug, new)]
pub struct JoinWaitlist {
    pub member_id: MemberId,
    pub session_id: SessionId,
}

/// Waitlist entry record handed to the store inside a session
/// transaction, with the server-computed priority already applied.
#[derive(Debug, new)]
pub struct CreateWaitlistEntry {
    pub member_id: MemberId,
    pub priority: i32,
    pub registered_at: DateTime<Utc>,
}
