use chrono::{NaiveDate, NaiveTime};
use garde::Validate;
use kernel::model::id::{InstructorId, RoomId, SessionId};
use kernel::model::session::event::ScheduleSession;
use kernel::model::session::{
    ClassKind, ClassSession, SessionAvailability, SessionFilter, SessionStatus,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSessionRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(skip)]
    pub kind: ClassKind,
    #[garde(skip)]
    pub session_date: NaiveDate,
    #[garde(skip)]
    pub start_time: NaiveTime,
    #[garde(range(min = 1))]
    pub duration_minutes: i32,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    pub instructor_id: Option<InstructorId>,
    #[garde(skip)]
    pub instructor_name: Option<String>,
    #[garde(skip)]
    pub room_id: Option<RoomId>,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub price_cents: i64,
}

impl From<ScheduleSessionRequest> for ScheduleSession {
    fn from(value: ScheduleSessionRequest) -> Self {
        let ScheduleSessionRequest {
            name,
            description,
            kind,
            session_date,
            start_time,
            duration_minutes,
            capacity,
            instructor_id,
            instructor_name,
            room_id,
            price_cents,
        } = value;
        ScheduleSession {
            name,
            description,
            kind,
            session_date,
            start_time,
            duration_minutes,
            capacity,
            instructor_id,
            instructor_name,
            room_id,
            price_cents,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub name: String,
    pub description: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub instructor_id: Option<InstructorId>,
    pub instructor_name: String,
    pub room_id: Option<RoomId>,
    pub price_cents: i64,
    pub status: SessionStatus,
}

impl From<ClassSession> for SessionResponse {
    fn from(value: ClassSession) -> Self {
        let ClassSession {
            session_id,
            name,
            description,
            kind,
            session_date,
            start_time,
            duration_minutes,
            capacity,
            instructor_id,
            instructor_name,
            room_id,
            price_cents,
            status,
        } = value;
        Self {
            session_id,
            name,
            description,
            kind,
            session_date,
            start_time,
            duration_minutes,
            capacity,
            instructor_id,
            instructor_name,
            room_id,
            price_cents,
            status,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub session_id: SessionId,
    pub name: String,
    pub kind: ClassKind,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub instructor_name: String,
    pub price_cents: i64,
    pub capacity: i32,
    pub seats_remaining: i64,
    pub is_full: bool,
    pub is_bookable: bool,
}

impl From<SessionAvailability> for AvailabilityResponse {
    fn from(value: SessionAvailability) -> Self {
        let SessionAvailability {
            session_id,
            name,
            kind,
            session_date,
            start_time,
            duration_minutes,
            instructor_name,
            price_cents,
            capacity,
            seats_remaining,
            is_full,
            is_bookable,
        } = value;
        Self {
            session_id,
            name,
            kind,
            session_date,
            start_time,
            duration_minutes,
            instructor_name,
            price_cents,
            capacity,
            seats_remaining,
            is_full,
            is_bookable,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitiesResponse {
    pub items: Vec<AvailabilityResponse>,
}

impl From<Vec<SessionAvailability>> for AvailabilitiesResponse {
    fn from(value: Vec<SessionAvailability>) -> Self {
        Self {
            items: value.into_iter().map(AvailabilityResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListQuery {
    pub kind: Option<ClassKind>,
    pub date: Option<NaiveDate>,
    pub instructor_id: Option<InstructorId>,
}

impl From<SessionListQuery> for SessionFilter {
    fn from(value: SessionListQuery) -> Self {
        let SessionListQuery {
            kind,
            date,
            instructor_id,
        } = value;
        SessionFilter {
            kind,
            date,
            instructor_id,
        }
    }
}
