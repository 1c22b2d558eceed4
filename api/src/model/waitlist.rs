use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::id::{MemberId, SessionId, WaitlistEntryId};
use kernel::model::waitlist::WaitlistEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinWaitlistRequest {
    #[garde(skip)]
    pub member_id: MemberId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntryResponse {
    pub entry_id: WaitlistEntryId,
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub priority: i32,
    pub registered_at: DateTime<Utc>,
    pub notified: bool,
}

impl From<WaitlistEntry> for WaitlistEntryResponse {
    fn from(value: WaitlistEntry) -> Self {
        let WaitlistEntry {
            entry_id,
            session_id,
            member_id,
            priority,
            registered_at,
            notified,
        } = value;
        Self {
            entry_id,
            session_id,
            member_id,
            priority,
            registered_at,
            notified,
        }
    }
}
