use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::attendance::event::RecordAttendance;
use kernel::model::attendance::Attendance;
use kernel::model::id::AttendanceId;
use kernel::model::report::{AttendanceTally, DateRange, NoShowRow};
use kernel::repository::attendance::AttendanceRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::attendance::{AttendanceTallyRow, NoShowReportRow};
use crate::database::{map_unique_violation, ConnectionPool};

#[derive(new)]
pub struct AttendanceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AttendanceRepository for AttendanceRepositoryImpl {
    async fn record(
        &self,
        event: RecordAttendance,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<Attendance> {
        let reservation_exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM reservations WHERE reservation_id = $1)
            "#,
        )
        .bind(event.reservation_id.raw())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if !reservation_exists {
            return Err(AppError::EntityNotFound("reservation not found".into()));
        }

        let attendance = Attendance {
            attendance_id: AttendanceId::new(),
            reservation_id: event.reservation_id,
            attended: event.attended,
            recorded_at,
            notes: event.notes,
        };

        let res = sqlx::query(
            r#"
            INSERT INTO attendances
                (attendance_id, reservation_id, attended, recorded_at, notes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(attendance.attendance_id.raw())
        .bind(attendance.reservation_id.raw())
        .bind(attendance.attended)
        .bind(attendance.recorded_at)
        .bind(&attendance.notes)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "attendance has already been recorded for this reservation",
            )
        })?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no attendance record has been created".into(),
            ));
        }

        Ok(attendance)
    }

    async fn no_show_rows(&self, range: DateRange) -> AppResult<Vec<NoShowRow>> {
        let rows: Vec<NoShowReportRow> = sqlx::query_as(
            r#"
            SELECT m.member_id, m.name AS member_name,
                   s.session_id, s.name AS session_name, s.kind,
                   s.session_date, s.start_time
            FROM attendances a
            INNER JOIN reservations r ON r.reservation_id = a.reservation_id
            INNER JOIN class_sessions s ON s.session_id = r.session_id
            INNER JOIN members m ON m.member_id = r.member_id
            WHERE a.attended = FALSE
              AND s.session_date BETWEEN $1 AND $2
            ORDER BY s.session_date, s.start_time
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(NoShowRow::try_from).collect()
    }

    async fn attendance_tallies(&self, range: DateRange) -> AppResult<Vec<AttendanceTally>> {
        let rows: Vec<AttendanceTallyRow> = sqlx::query_as(
            r#"
            SELECT s.session_id, s.name AS session_name, s.session_date,
                   COUNT(r.reservation_id) FILTER (WHERE r.status = 'confirmed')
                       AS total_reservations,
                   COUNT(a.attendance_id) FILTER (WHERE a.attended)
                       AS total_attended,
                   COUNT(a.attendance_id) FILTER (WHERE NOT a.attended)
                       AS total_no_shows
            FROM class_sessions s
            LEFT JOIN reservations r ON r.session_id = s.session_id
            LEFT JOIN attendances a ON a.reservation_id = r.reservation_id
            WHERE s.session_date BETWEEN $1 AND $2
            GROUP BY s.session_id, s.name, s.session_date, s.start_time
            ORDER BY s.session_date, s.start_time
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(AttendanceTally::from).collect())
    }
}
