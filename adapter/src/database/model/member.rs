use kernel::model::member::Member;
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct MemberRow {
    pub member_id: Uuid,
    pub member_number: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
    pub membership_start: NaiveDate,
    pub membership_end: NaiveDate,
    pub status: String,
}

impl TryFrom<MemberRow> for Member {
    type Error = AppError;

    fn try_from(value: MemberRow) -> Result<Self, Self::Error> {
        let MemberRow {
            member_id,
            member_number,
            name,
            joined_at,
            membership_start,
            membership_end,
            status,
        } = value;
        Ok(Member {
            member_id: member_id.into(),
            member_number,
            name,
            joined_at,
            membership_start,
            membership_end,
            status: status.parse()?,
        })
    }
}
