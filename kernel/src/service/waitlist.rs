use std::sync::Arc;

use derive_new::new;
use shared::config::BookingConfig;
use shared::error::{AppError, AppResult};

use crate::clock::Clock;
use crate::model::id::SessionId;
use crate::model::reservation::event::CreateReservation;
use crate::model::reservation::{Reservation, ReservationStatus};
use crate::model::waitlist::event::{CreateWaitlistEntry, JoinWaitlist};
use crate::model::waitlist::WaitlistEntry;
use crate::notifier::Notifier;
use crate::repository::booking::BookingRepository;

/// Waitlist membership and promotion. Promotion runs under the same
/// per-session lock as booking, so it can never oversell a seat that
/// a concurrent booking is taking.
#[derive(new)]
pub struct WaitlistService {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    config: BookingConfig,
}

impl WaitlistService {
    /// Join the waitlist of a full session. The priority score is
    /// always computed here, whatever the caller claims.
    pub async fn join(&self, cmd: JoinWaitlist) -> AppResult<WaitlistEntry> {
        let now = self.clock.now();

        let mut tx = self
            .bookings
            .begin_session(cmd.session_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("class session not found".into()))?;

        let member = tx
            .member_profile(cmd.member_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("member not found".into()))?;

        let confirmed_count = tx.confirmed_count().await?;
        if !tx.session().is_full(confirmed_count) {
            return Err(AppError::SessionNotFull(
                "this class still has free seats; book it directly".into(),
            ));
        }
        if tx.waitlist_contains(cmd.member_id).await? {
            return Err(AppError::DuplicateEntry(
                "you are already on the waitlist for this class".into(),
            ));
        }

        let prior_confirmed = tx.prior_confirmed_count(cmd.member_id).await?;
        let priority = member.priority_score(now, prior_confirmed, self.config.priority_weight);
        let entry = tx
            .insert_waitlist_entry(CreateWaitlistEntry::new(cmd.member_id, priority, now))
            .await?;
        tx.commit().await?;

        tracing::info!(
            entry_id = %entry.entry_id,
            session_id = %cmd.session_id,
            member_id = %cmd.member_id,
            priority = entry.priority,
            "joined waitlist"
        );
        Ok(entry)
    }

    /// Promote the best waitlist candidate into a confirmed seat, if a
    /// seat is free. Returns `None` when there is nothing to do. The
    /// promoted reservation inherits the waitlist entry's priority.
    pub async fn promote_next(&self, session_id: SessionId) -> AppResult<Option<Reservation>> {
        let now = self.clock.now();

        let mut tx = self
            .bookings
            .begin_session(session_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("class session not found".into()))?;

        // Re-check under the lock; the freed seat may already be gone.
        let confirmed_count = tx.confirmed_count().await?;
        if tx.session().seats_remaining(confirmed_count) == 0 {
            return Ok(None);
        }
        let Some(entry) = tx.next_waitlist_entry().await? else {
            return Ok(None);
        };

        let reservation = tx
            .insert_reservation(CreateReservation::new(
                entry.member_id,
                ReservationStatus::Confirmed,
                entry.priority,
                now,
            ))
            .await?;
        tx.mark_notified(entry.entry_id).await?;
        let session = tx.session().clone();
        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.reservation_id,
            session_id = %session_id,
            member_id = %entry.member_id,
            "waitlist entry promoted"
        );
        self.notifier.promoted(entry.member_id, &session).await;
        Ok(Some(reservation))
    }
}
