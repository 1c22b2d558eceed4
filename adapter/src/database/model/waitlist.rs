use kernel::model::waitlist::WaitlistEntry;
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct WaitlistEntryRow {
    pub entry_id: Uuid,
    pub session_id: Uuid,
    pub member_id: Uuid,
    pub priority: i32,
    pub registered_at: DateTime<Utc>,
    pub notified: bool,
}

impl From<WaitlistEntryRow> for WaitlistEntry {
    fn from(value: WaitlistEntryRow) -> Self {
        let WaitlistEntryRow {
            entry_id,
            session_id,
            member_id,
            priority,
            registered_at,
            notified,
        } = value;
        WaitlistEntry {
            entry_id: entry_id.into(),
            session_id: session_id.into(),
            member_id: member_id.into(),
            priority,
            registered_at,
            notified,
        }
    }
}
