use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

use crate::model::id::{InstructorId, RoomId, SessionId};
use crate::model::instructor::Instructor;
use crate::model::room::Room;
use crate::model::session::{ClassSession, SessionFilter, SessionOccupancy};

/// Catalog reads and session scheduling, plus the room and instructor
/// lookups scheduling depends on.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &ClassSession) -> AppResult<()>;

    async fn find_by_id(&self, session_id: SessionId) -> AppResult<Option<ClassSession>>;

    /// Scheduled sessions assigned to a room, for overlap checks.
    async fn find_scheduled_in_room(&self, room_id: RoomId) -> AppResult<Vec<ClassSession>>;

    /// Scheduled sessions on or after `today` matching the filter, each
    /// with its confirmed count, ordered by date and start time.
    async fn search_upcoming(
        &self,
        filter: &SessionFilter,
        today: NaiveDate,
    ) -> AppResult<Vec<SessionOccupancy>>;

    /// One session with its confirmed count. A snapshot: counts may be
    /// stale by the time the caller acts on them.
    async fn occupancy(&self, session_id: SessionId) -> AppResult<Option<SessionOccupancy>>;

    async fn find_room(&self, room_id: RoomId) -> AppResult<Option<Room>>;

    async fn find_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> AppResult<Option<Instructor>>;
}
