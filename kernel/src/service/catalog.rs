use std::sync::Arc;

use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::clock::Clock;
use crate::model::id::SessionId;
use crate::model::session::event::ScheduleSession;
use crate::model::session::{ClassSession, SessionStatus};
use crate::repository::session::SessionRepository;

/// Puts sessions on the calendar. Scheduling is plain validation plus
/// an insert; the contended paths live in the booking services.
#[derive(new)]
pub struct CatalogService {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub async fn schedule_session(&self, event: ScheduleSession) -> AppResult<ClassSession> {
        let today = self.clock.now().date_naive();
        if event.session_date < today {
            return Err(AppError::UnprocessableEntity(
                "classes cannot be scheduled in the past".into(),
            ));
        }
        if event.capacity < 1 {
            return Err(AppError::UnprocessableEntity(
                "capacity must be at least 1".into(),
            ));
        }
        if event.duration_minutes < 1 {
            return Err(AppError::UnprocessableEntity(
                "duration must be at least one minute".into(),
            ));
        }

        let instructor_name = match event.instructor_id {
            Some(instructor_id) => {
                self.sessions
                    .find_instructor(instructor_id)
                    .await?
                    .ok_or_else(|| AppError::EntityNotFound("instructor not found".into()))?
                    .name
            }
            None => event.instructor_name.clone().unwrap_or_default(),
        };
        if let Some(room_id) = event.room_id {
            if self.sessions.find_room(room_id).await?.is_none() {
                return Err(AppError::EntityNotFound("room not found".into()));
            }
        }

        let session = ClassSession {
            session_id: SessionId::new(),
            name: event.name,
            description: event.description,
            kind: event.kind,
            session_date: event.session_date,
            start_time: event.start_time,
            duration_minutes: event.duration_minutes,
            capacity: event.capacity,
            instructor_id: event.instructor_id,
            instructor_name,
            room_id: event.room_id,
            price_cents: event.price_cents,
            status: SessionStatus::Scheduled,
        };

        if let Some(room_id) = session.room_id {
            let scheduled = self.sessions.find_scheduled_in_room(room_id).await?;
            if let Some(other) = scheduled.iter().find(|s| s.overlaps(&session)) {
                return Err(AppError::RoomConflict(format!(
                    "the room is already booked by \"{}\" at that time",
                    other.name
                )));
            }
        }

        self.sessions.insert(&session).await?;
        tracing::info!(
            session_id = %session.session_id,
            name = %session.name,
            date = %session.session_date,
            "class session scheduled"
        );
        Ok(session)
    }
}
