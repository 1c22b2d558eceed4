use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use kernel::model::id::{MemberId, ReservationId, SessionId, WaitlistEntryId};
use kernel::model::member::Member;
use kernel::model::reservation::event::CreateReservation;
use kernel::model::reservation::{MemberBooking, Reservation, ReservationStatus};
use kernel::model::session::ClassSession;
use kernel::model::waitlist::event::CreateWaitlistEntry;
use kernel::model::waitlist::WaitlistEntry;
use kernel::repository::booking::{BookingRepository, SessionTx};
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::model::member::MemberRow;
use crate::database::model::reservation::{MemberBookingRow, ReservationRow};
use crate::database::model::session::SessionRow;
use crate::database::model::waitlist::WaitlistEntryRow;
use crate::database::{map_unique_violation, ConnectionPool};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn begin_session(&self, session_id: SessionId) -> AppResult<Option<Box<dyn SessionTx>>> {
        let mut tx = self.db.begin().await?;

        // The row lock is the per-session exclusive lock: every
        // seat-allocating write starts by locking this row, so two of
        // them can never interleave for the same session.
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT session_id, name, description, kind, session_date, start_time,
                   duration_minutes, capacity, instructor_id, instructor_name,
                   room_id, price_cents, status
            FROM class_sessions
            WHERE session_id = $1
            FOR UPDATE
            "#,
        )
        .bind(session_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            None => Ok(None),
            Some(row) => {
                let session = ClassSession::try_from(row)?;
                Ok(Some(Box::new(PgSessionTx { tx, session })))
            }
        }
    }

    async fn find_reservation_for_member(
        &self,
        reservation_id: ReservationId,
        member_id: MemberId,
    ) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, session_id, member_id, status, priority,
                   reserved_at, cancelled_at
            FROM reservations
            WHERE reservation_id = $1 AND member_id = $2
            "#,
        )
        .bind(reservation_id.raw())
        .bind(member_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Reservation::try_from).transpose()
    }

    async fn mark_cancelled(
        &self,
        reservation_id: ReservationId,
        cancelled_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        // Conditional on the current status so racing cancels cannot
        // both succeed; the losers see zero rows affected.
        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'cancelled', cancelled_at = $2
            WHERE reservation_id = $1 AND status = 'confirmed'
            "#,
        )
        .bind(reservation_id.raw())
        .bind(cancelled_at)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() > 0)
    }

    async fn reservations_for_member(
        &self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> AppResult<Vec<MemberBooking>> {
        let rows: Vec<MemberBookingRow> = sqlx::query_as(
            r#"
            SELECT r.reservation_id, r.session_id, r.member_id, r.status,
                   r.priority, r.reserved_at, r.cancelled_at,
                   s.name AS session_name, s.kind, s.session_date, s.start_time
            FROM reservations r
            INNER JOIN class_sessions s ON s.session_id = r.session_id
            WHERE r.member_id = $1
              AND r.status = 'confirmed'
              AND s.session_date >= $2
            ORDER BY s.session_date, s.start_time
            "#,
        )
        .bind(member_id.raw())
        .bind(today)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(MemberBooking::try_from).collect()
    }
}

pub struct PgSessionTx {
    tx: Transaction<'static, Postgres>,
    session: ClassSession,
}

#[async_trait]
impl SessionTx for PgSessionTx {
    fn session(&self) -> &ClassSession {
        &self.session
    }

    async fn member_profile(&mut self, member_id: MemberId) -> AppResult<Option<Member>> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT member_id, member_number, name, joined_at,
                   membership_start, membership_end, status
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.raw())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Member::try_from).transpose()
    }

    async fn confirmed_count(&mut self) -> AppResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE session_id = $1 AND status = 'confirmed'
            "#,
        )
        .bind(self.session.session_id.raw())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn active_reservation_count(
        &mut self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reservations r
            INNER JOIN class_sessions s ON s.session_id = r.session_id
            WHERE r.member_id = $1
              AND r.status = 'confirmed'
              AND s.session_date >= $2
            "#,
        )
        .bind(member_id.raw())
        .bind(today)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn has_confirmed_reservation(&mut self, member_id: MemberId) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE session_id = $1 AND member_id = $2 AND status = 'confirmed'
            )
            "#,
        )
        .bind(self.session.session_id.raw())
        .bind(member_id.raw())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn prior_confirmed_count(&mut self, member_id: MemberId) -> AppResult<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE member_id = $1 AND status = 'confirmed'
            "#,
        )
        .bind(member_id.raw())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn insert_reservation(&mut self, event: CreateReservation) -> AppResult<Reservation> {
        // Last line of defense: the count is read inside the locking
        // transaction, so it cannot be stale.
        if event.status == ReservationStatus::Confirmed {
            let confirmed = self.confirmed_count().await?;
            if self.session.seats_remaining(confirmed) == 0 {
                return Err(AppError::CapacityExceeded(
                    "the class filled up while processing this request".into(),
                ));
            }
        }

        let reservation = Reservation {
            reservation_id: ReservationId::new(),
            session_id: self.session.session_id,
            member_id: event.member_id,
            status: event.status,
            priority: event.priority,
            reserved_at: event.reserved_at,
            cancelled_at: None,
        };

        let res = sqlx::query(
            r#"
            INSERT INTO reservations
                (reservation_id, session_id, member_id, status, priority, reserved_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reservation.reservation_id.raw())
        .bind(reservation.session_id.raw())
        .bind(reservation.member_id.raw())
        .bind(reservation.status.as_str())
        .bind(reservation.priority)
        .bind(reservation.reserved_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, "you already have a reservation for this class")
        })?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }

        Ok(reservation)
    }

    async fn waitlist_contains(&mut self, member_id: MemberId) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM waitlist_entries
                WHERE session_id = $1 AND member_id = $2
            )
            "#,
        )
        .bind(self.session.session_id.raw())
        .bind(member_id.raw())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn insert_waitlist_entry(
        &mut self,
        event: CreateWaitlistEntry,
    ) -> AppResult<WaitlistEntry> {
        let entry = WaitlistEntry {
            entry_id: WaitlistEntryId::new(),
            session_id: self.session.session_id,
            member_id: event.member_id,
            priority: event.priority,
            registered_at: event.registered_at,
            notified: false,
        };

        let res = sqlx::query(
            r#"
            INSERT INTO waitlist_entries
                (entry_id, session_id, member_id, priority, registered_at, notified)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.entry_id.raw())
        .bind(entry.session_id.raw())
        .bind(entry.member_id.raw())
        .bind(entry.priority)
        .bind(entry.registered_at)
        .bind(entry.notified)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, "you are already on the waitlist for this class")
        })?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no waitlist entry has been created".into(),
            ));
        }

        Ok(entry)
    }

    async fn next_waitlist_entry(&mut self) -> AppResult<Option<WaitlistEntry>> {
        let row: Option<WaitlistEntryRow> = sqlx::query_as(
            r#"
            SELECT entry_id, session_id, member_id, priority, registered_at, notified
            FROM waitlist_entries
            WHERE session_id = $1 AND notified = FALSE
            ORDER BY priority DESC, registered_at ASC
            LIMIT 1
            "#,
        )
        .bind(self.session.session_id.raw())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(WaitlistEntry::from))
    }

    async fn mark_notified(&mut self, entry_id: WaitlistEntryId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE waitlist_entries SET notified = TRUE WHERE entry_id = $1
            "#,
        )
        .bind(entry_id.raw())
        .execute(&mut *self.tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no waitlist entry has been updated".into(),
            ));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(AppError::TransactionError)
    }
}
