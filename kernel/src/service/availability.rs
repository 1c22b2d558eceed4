use std::sync::Arc;

use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::clock::Clock;
use crate::model::id::SessionId;
use crate::model::session::{SessionAvailability, SessionFilter};
use crate::repository::session::SessionRepository;

/// Read-only availability projections. Results are snapshots and may
/// be stale the moment they are returned; booking re-checks under the
/// session lock.
#[derive(new)]
pub struct AvailabilityService {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub async fn snapshot(&self, session_id: SessionId) -> AppResult<SessionAvailability> {
        let now = self.clock.now();
        let occupancy = self
            .sessions
            .occupancy(session_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("class session not found".into()))?;
        Ok(SessionAvailability::project(
            &occupancy.session,
            occupancy.confirmed_count,
            now,
        ))
    }

    /// Upcoming scheduled sessions matching the filter, each with its
    /// derived availability.
    pub async fn search(&self, filter: &SessionFilter) -> AppResult<Vec<SessionAvailability>> {
        let now = self.clock.now();
        let occupancies = self.sessions.search_upcoming(filter, now.date_naive()).await?;
        Ok(occupancies
            .iter()
            .map(|o| SessionAvailability::project(&o.session, o.confirmed_count, now))
            .collect())
    }
}
