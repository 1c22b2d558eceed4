use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::model::id::{InstructorId, RoomId, SessionId};
use kernel::model::instructor::Instructor;
use kernel::model::room::Room;
use kernel::model::session::{ClassSession, SessionFilter, SessionOccupancy};
use kernel::repository::session::SessionRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::instructor::InstructorRow;
use crate::database::model::room::RoomRow;
use crate::database::model::session::{SessionOccupancyRow, SessionRow};
use crate::database::ConnectionPool;

#[derive(new)]
pub struct SessionRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SessionRepository for SessionRepositoryImpl {
    async fn insert(&self, session: &ClassSession) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            INSERT INTO class_sessions
                (session_id, name, description, kind, session_date, start_time,
                 duration_minutes, capacity, instructor_id, instructor_name,
                 room_id, price_cents, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(session.session_id.raw())
        .bind(&session.name)
        .bind(&session.description)
        .bind(session.kind.as_str())
        .bind(session.session_date)
        .bind(session.start_time)
        .bind(session.duration_minutes)
        .bind(session.capacity)
        .bind(session.instructor_id.map(|id| id.raw()))
        .bind(&session.instructor_name)
        .bind(session.room_id.map(|id| id.raw()))
        .bind(session.price_cents)
        .bind(session.status.as_str())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no class session has been created".into(),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AppResult<Option<ClassSession>> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT session_id, name, description, kind, session_date, start_time,
                   duration_minutes, capacity, instructor_id, instructor_name,
                   room_id, price_cents, status
            FROM class_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(ClassSession::try_from).transpose()
    }

    async fn find_scheduled_in_room(&self, room_id: RoomId) -> AppResult<Vec<ClassSession>> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            r#"
            SELECT session_id, name, description, kind, session_date, start_time,
                   duration_minutes, capacity, instructor_id, instructor_name,
                   room_id, price_cents, status
            FROM class_sessions
            WHERE room_id = $1 AND status = 'scheduled'
            "#,
        )
        .bind(room_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(ClassSession::try_from).collect()
    }

    async fn search_upcoming(
        &self,
        filter: &SessionFilter,
        today: NaiveDate,
    ) -> AppResult<Vec<SessionOccupancy>> {
        let rows: Vec<SessionOccupancyRow> = sqlx::query_as(
            r#"
            SELECT s.session_id, s.name, s.description, s.kind, s.session_date,
                   s.start_time, s.duration_minutes, s.capacity, s.instructor_id,
                   s.instructor_name, s.room_id, s.price_cents, s.status,
                   COALESCE(c.confirmed_count, 0) AS confirmed_count
            FROM class_sessions s
            LEFT JOIN (
                SELECT session_id, COUNT(*) AS confirmed_count
                FROM reservations
                WHERE status = 'confirmed'
                GROUP BY session_id
            ) c ON c.session_id = s.session_id
            WHERE s.status = 'scheduled'
              AND s.session_date >= $1
              AND ($2::text IS NULL OR s.kind = $2)
              AND ($3::date IS NULL OR s.session_date = $3)
              AND ($4::uuid IS NULL OR s.instructor_id = $4)
            ORDER BY s.session_date, s.start_time
            "#,
        )
        .bind(today)
        .bind(filter.kind.map(|k| k.as_str().to_string()))
        .bind(filter.date)
        .bind(filter.instructor_id.map(|id| id.raw()))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(SessionOccupancy::try_from).collect()
    }

    async fn occupancy(&self, session_id: SessionId) -> AppResult<Option<SessionOccupancy>> {
        let row: Option<SessionOccupancyRow> = sqlx::query_as(
            r#"
            SELECT s.session_id, s.name, s.description, s.kind, s.session_date,
                   s.start_time, s.duration_minutes, s.capacity, s.instructor_id,
                   s.instructor_name, s.room_id, s.price_cents, s.status,
                   (
                       SELECT COUNT(*) FROM reservations r
                       WHERE r.session_id = s.session_id AND r.status = 'confirmed'
                   ) AS confirmed_count
            FROM class_sessions s
            WHERE s.session_id = $1
            "#,
        )
        .bind(session_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(SessionOccupancy::try_from).transpose()
    }

    async fn find_room(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
            SELECT room_id, name, capacity FROM rooms WHERE room_id = $1
            "#,
        )
        .bind(room_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Room::from))
    }

    async fn find_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> AppResult<Option<Instructor>> {
        let row: Option<InstructorRow> = sqlx::query_as(
            r#"
            SELECT instructor_id, name, specialties FROM instructors
            WHERE instructor_id = $1
            "#,
        )
        .bind(instructor_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Instructor::from))
    }
}
