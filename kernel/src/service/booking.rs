use std::sync::Arc;

use derive_new::new;
use shared::config::BookingConfig;
use shared::error::{AppError, AppResult};

use crate::clock::Clock;
use crate::model::id::MemberId;
use crate::model::reservation::event::{CancelReservation, CreateReservation, ReserveClass};
use crate::model::reservation::{MemberBooking, Reservation, ReservationStatus};
use crate::repository::booking::BookingRepository;
use crate::repository::session::SessionRepository;
use crate::service::validation::{validate_all, BookingFacts, NO_MEMBER_PROFILE};
use crate::service::waitlist::WaitlistService;

/// The only writer of reservations. Owns the create and cancel
/// sequences, including the authoritative re-checks under the
/// session lock.
#[derive(new)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    sessions: Arc<dyn SessionRepository>,
    waitlist: Arc<WaitlistService>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl BookingService {
    /// Book a seat. All booking rules run against state read under the
    /// session lock, so a pass cannot be invalidated by a concurrent
    /// request for the same session.
    pub async fn create_reservation(&self, cmd: ReserveClass) -> AppResult<Reservation> {
        let now = self.clock.now();
        let today = now.date_naive();

        let mut tx = self
            .bookings
            .begin_session(cmd.session_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("class session not found".into()))?;

        let member = tx.member_profile(cmd.member_id).await?;
        let confirmed_count = tx.confirmed_count().await?;
        let active_reservation_count = tx.active_reservation_count(cmd.member_id, today).await?;
        let already_booked = tx.has_confirmed_reservation(cmd.member_id).await?;

        let reasons = {
            let facts = BookingFacts {
                session: tx.session(),
                confirmed_count,
                member: member.as_ref(),
                active_reservation_count,
                already_booked,
                now,
                max_active_reservations: self.config.max_active_reservations,
            };
            validate_all(&facts)
        };
        if !reasons.is_empty() {
            tracing::debug!(
                session_id = %cmd.session_id,
                member_id = %cmd.member_id,
                reasons = ?reasons,
                "reservation rejected by booking rules"
            );
            return Err(AppError::ValidationFailed(reasons));
        }
        let Some(member) = member else {
            // The membership rule rejects this before we get here.
            return Err(AppError::ValidationFailed(vec![NO_MEMBER_PROFILE.into()]));
        };

        let prior_confirmed = tx.prior_confirmed_count(cmd.member_id).await?;
        let priority = member.priority_score(now, prior_confirmed, self.config.priority_weight);
        let reservation = tx
            .insert_reservation(CreateReservation::new(
                cmd.member_id,
                ReservationStatus::Confirmed,
                priority,
                now,
            ))
            .await?;
        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.reservation_id,
            session_id = %cmd.session_id,
            member_id = %cmd.member_id,
            "reservation confirmed"
        );
        Ok(reservation)
    }

    /// Cancel a confirmed reservation, then try to promote from the
    /// waitlist. Promotion is best effort: its failure is logged and
    /// never surfaced, the cancellation stands.
    pub async fn cancel_reservation(&self, cmd: CancelReservation) -> AppResult<()> {
        let now = self.clock.now();

        let reservation = self
            .bookings
            .find_reservation_for_member(cmd.reservation_id, cmd.member_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("reservation not found".into()))?;
        if reservation.status != ReservationStatus::Confirmed {
            return Err(AppError::InvalidState(
                "only confirmed reservations can be cancelled".into(),
            ));
        }

        let session = self
            .sessions
            .find_by_id(reservation.session_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("class session not found".into()))?;
        if !reservation.cancellable(
            session.starts_at(),
            self.config.cancellation_cutoff_hours,
            now,
        ) {
            return Err(AppError::CancellationTooLate(format!(
                "reservations can only be cancelled up to {} hours before the class starts",
                self.config.cancellation_cutoff_hours
            )));
        }

        // Conditional write: a racing cancel loses here, not above.
        let cancelled = self.bookings.mark_cancelled(cmd.reservation_id, now).await?;
        if !cancelled {
            return Err(AppError::InvalidState(
                "only confirmed reservations can be cancelled".into(),
            ));
        }
        tracing::info!(
            reservation_id = %cmd.reservation_id,
            session_id = %reservation.session_id,
            member_id = %cmd.member_id,
            "reservation cancelled"
        );

        if let Err(error) = self.waitlist.promote_next(reservation.session_id).await {
            tracing::warn!(
                error = %error,
                session_id = %reservation.session_id,
                "waitlist promotion failed after cancellation"
            );
        }
        Ok(())
    }

    /// Upcoming confirmed reservations of one member.
    pub async fn reservations_for_member(
        &self,
        member_id: MemberId,
    ) -> AppResult<Vec<MemberBooking>> {
        let today = self.clock.now().date_naive();
        self.bookings.reservations_for_member(member_id, today).await
    }
}
