use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::error::AppResult;

use crate::model::id::{MemberId, ReservationId, SessionId, WaitlistEntryId};
use crate::model::member::Member;
use crate::model::reservation::event::CreateReservation;
use crate::model::reservation::{MemberBooking, Reservation};
use crate::model::session::ClassSession;
use crate::model::waitlist::event::CreateWaitlistEntry;
use crate::model::waitlist::WaitlistEntry;

/// Store operations for reservations and waitlists.
///
/// Seat-allocating writes go through [`SessionTx`]; the plain methods
/// here either read snapshots or, in the case of cancellation, flip a
/// single row with a guard on its current state.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Open a transaction holding the exclusive lock for one session.
    ///
    /// Everything read through the returned handle is authoritative
    /// until commit: no other seat-allocating write for the same
    /// session can run concurrently. Returns `None` when the session
    /// does not exist. Dropping the handle without committing rolls
    /// every staged write back.
    async fn begin_session(&self, session_id: SessionId) -> AppResult<Option<Box<dyn SessionTx>>>;

    /// Look up a reservation, scoped to its owner.
    async fn find_reservation_for_member(
        &self,
        reservation_id: ReservationId,
        member_id: MemberId,
    ) -> AppResult<Option<Reservation>>;

    /// Move a confirmed reservation to cancelled. Returns `false` when
    /// the reservation was not confirmed anymore, in which case nothing
    /// was written. This is the idempotence guard for racing cancels.
    async fn mark_cancelled(
        &self,
        reservation_id: ReservationId,
        cancelled_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Upcoming confirmed reservations of one member, joined with their
    /// sessions and ordered by session date and start time.
    async fn reservations_for_member(
        &self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> AppResult<Vec<MemberBooking>>;
}

/// An open transaction bound to one session's exclusive lock.
///
/// All reads see committed state plus this transaction's own staged
/// writes. `commit` applies the staged writes atomically; dropping the
/// handle rolls them back and releases the lock either way.
#[async_trait]
pub trait SessionTx: Send {
    /// The locked session as of lock acquisition.
    fn session(&self) -> &ClassSession;

    async fn member_profile(&mut self, member_id: MemberId) -> AppResult<Option<Member>>;

    /// Confirmed reservations for the locked session. Authoritative.
    async fn confirmed_count(&mut self) -> AppResult<i64>;

    /// Confirmed reservations of this member for sessions on or after
    /// `today`, across the whole timetable.
    async fn active_reservation_count(
        &mut self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> AppResult<i64>;

    /// Whether this member already holds a confirmed seat in the
    /// locked session.
    async fn has_confirmed_reservation(&mut self, member_id: MemberId) -> AppResult<bool>;

    /// All-time count of confirmed reservations of this member, used
    /// for the priority score.
    async fn prior_confirmed_count(&mut self, member_id: MemberId) -> AppResult<i64>;

    /// Stage a reservation for the locked session. Fails with
    /// `CapacityExceeded` when the session is already at capacity and
    /// with `DuplicateEntry` if the member already holds a confirmed
    /// seat; both are unreachable for callers that validated under
    /// this lock, and final for those that did not.
    async fn insert_reservation(&mut self, event: CreateReservation) -> AppResult<Reservation>;

    /// Whether this member is already on the locked session's waitlist.
    async fn waitlist_contains(&mut self, member_id: MemberId) -> AppResult<bool>;

    /// Stage a waitlist entry. Fails with `DuplicateEntry` if the
    /// member is already on the list.
    async fn insert_waitlist_entry(
        &mut self,
        event: CreateWaitlistEntry,
    ) -> AppResult<WaitlistEntry>;

    /// Next candidate for promotion: highest priority, earliest
    /// registration, not yet notified.
    async fn next_waitlist_entry(&mut self) -> AppResult<Option<WaitlistEntry>>;

    /// Mark a waitlist entry as promoted so it is never picked again.
    async fn mark_notified(&mut self, entry_id: WaitlistEntryId) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
