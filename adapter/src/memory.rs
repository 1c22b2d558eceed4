//! In-memory store with the same transactional contract as the
//! Postgres repositories: one exclusive lock per session, writes
//! staged until commit, dropped transactions leave no trace. Used as
//! the test double and for ephemeral demo setups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::model::attendance::event::RecordAttendance;
use kernel::model::attendance::Attendance;
use kernel::model::id::{
    AttendanceId, InstructorId, MemberId, ReservationId, RoomId, SessionId, WaitlistEntryId,
};
use kernel::model::instructor::Instructor;
use kernel::model::member::Member;
use kernel::model::report::{AttendanceTally, DateRange, NoShowRow};
use kernel::model::reservation::event::CreateReservation;
use kernel::model::reservation::{MemberBooking, Reservation, ReservationStatus};
use kernel::model::room::Room;
use kernel::model::session::{ClassSession, SessionFilter, SessionOccupancy, SessionStatus};
use kernel::model::waitlist::event::CreateWaitlistEntry;
use kernel::model::waitlist::{promotion_order, WaitlistEntry};
use kernel::repository::attendance::AttendanceRepository;
use kernel::repository::booking::{BookingRepository, SessionTx};
use kernel::repository::session::SessionRepository;
use shared::error::{AppError, AppResult};

#[derive(Default)]
struct StoreData {
    members: HashMap<MemberId, Member>,
    instructors: HashMap<InstructorId, Instructor>,
    rooms: HashMap<RoomId, Room>,
    sessions: HashMap<SessionId, ClassSession>,
    reservations: HashMap<ReservationId, Reservation>,
    waitlist: HashMap<WaitlistEntryId, WaitlistEntry>,
    attendances: HashMap<AttendanceId, Attendance>,
}

#[derive(Default)]
struct StoreInner {
    data: Mutex<StoreData>,
    session_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_member(&self, member: Member) {
        let mut data = self.inner.data.lock().await;
        data.members.insert(member.member_id, member);
    }

    pub async fn add_instructor(&self, instructor: Instructor) {
        let mut data = self.inner.data.lock().await;
        data.instructors.insert(instructor.instructor_id, instructor);
    }

    pub async fn add_room(&self, room: Room) {
        let mut data = self.inner.data.lock().await;
        data.rooms.insert(room.room_id, room);
    }

    pub async fn add_session(&self, session: ClassSession) {
        let mut data = self.inner.data.lock().await;
        data.sessions.insert(session.session_id, session);
    }

    pub async fn reservation(&self, reservation_id: ReservationId) -> Option<Reservation> {
        let data = self.inner.data.lock().await;
        data.reservations.get(&reservation_id).cloned()
    }

    pub async fn waitlist_entries(&self, session_id: SessionId) -> Vec<WaitlistEntry> {
        let data = self.inner.data.lock().await;
        let mut entries: Vec<WaitlistEntry> = data
            .waitlist
            .values()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        entries.sort_by(promotion_order);
        entries
    }
}

enum Staged {
    Reservation(Reservation),
    WaitlistEntry(WaitlistEntry),
    Notified(WaitlistEntryId),
}

struct MemSessionTx {
    inner: Arc<StoreInner>,
    session: ClassSession,
    staged: Vec<Staged>,
    _permit: OwnedMutexGuard<()>,
}

impl MemSessionTx {
    fn staged_confirmed(&self) -> impl Iterator<Item = &Reservation> {
        self.staged.iter().filter_map(|w| match w {
            Staged::Reservation(r) if r.status == ReservationStatus::Confirmed => Some(r),
            _ => None,
        })
    }

    fn staged_waitlist(&self) -> impl Iterator<Item = &WaitlistEntry> {
        self.staged.iter().filter_map(|w| match w {
            Staged::WaitlistEntry(e) => Some(e),
            _ => None,
        })
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn begin_session(&self, session_id: SessionId) -> AppResult<Option<Box<dyn SessionTx>>> {
        let lock = {
            let mut locks = self.inner.session_locks.lock().await;
            locks.entry(session_id).or_default().clone()
        };
        // Held until the transaction is committed or dropped; this is
        // the in-process equivalent of the row lock.
        let permit = lock.lock_owned().await;

        let session = {
            let data = self.inner.data.lock().await;
            data.sessions.get(&session_id).cloned()
        };
        match session {
            None => Ok(None),
            Some(session) => Ok(Some(Box::new(MemSessionTx {
                inner: Arc::clone(&self.inner),
                session,
                staged: Vec::new(),
                _permit: permit,
            }))),
        }
    }

    async fn find_reservation_for_member(
        &self,
        reservation_id: ReservationId,
        member_id: MemberId,
    ) -> AppResult<Option<Reservation>> {
        let data = self.inner.data.lock().await;
        Ok(data
            .reservations
            .get(&reservation_id)
            .filter(|r| r.member_id == member_id)
            .cloned())
    }

    async fn mark_cancelled(
        &self,
        reservation_id: ReservationId,
        cancelled_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut data = self.inner.data.lock().await;
        match data.reservations.get_mut(&reservation_id) {
            Some(r) if r.status == ReservationStatus::Confirmed => {
                r.status = ReservationStatus::Cancelled;
                r.cancelled_at = Some(cancelled_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reservations_for_member(
        &self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> AppResult<Vec<MemberBooking>> {
        let data = self.inner.data.lock().await;
        let mut bookings: Vec<MemberBooking> = data
            .reservations
            .values()
            .filter(|r| r.member_id == member_id && r.status == ReservationStatus::Confirmed)
            .filter_map(|r| {
                let session = data.sessions.get(&r.session_id)?;
                (session.session_date >= today).then(|| MemberBooking {
                    reservation: r.clone(),
                    session_name: session.name.clone(),
                    kind: session.kind,
                    session_date: session.session_date,
                    start_time: session.start_time,
                })
            })
            .collect();
        bookings.sort_by_key(|b| (b.session_date, b.start_time));
        Ok(bookings)
    }
}

#[async_trait]
impl SessionTx for MemSessionTx {
    fn session(&self) -> &ClassSession {
        &self.session
    }

    async fn member_profile(&mut self, member_id: MemberId) -> AppResult<Option<Member>> {
        let data = self.inner.data.lock().await;
        Ok(data.members.get(&member_id).cloned())
    }

    async fn confirmed_count(&mut self) -> AppResult<i64> {
        let data = self.inner.data.lock().await;
        let committed = data
            .reservations
            .values()
            .filter(|r| {
                r.session_id == self.session.session_id
                    && r.status == ReservationStatus::Confirmed
            })
            .count();
        Ok(committed as i64 + self.staged_confirmed().count() as i64)
    }

    async fn active_reservation_count(
        &mut self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> AppResult<i64> {
        let data = self.inner.data.lock().await;
        let committed = data
            .reservations
            .values()
            .filter(|r| r.member_id == member_id && r.status == ReservationStatus::Confirmed)
            .filter(|r| {
                data.sessions
                    .get(&r.session_id)
                    .is_some_and(|s| s.session_date >= today)
            })
            .count();
        let staged = self
            .staged_confirmed()
            .filter(|r| r.member_id == member_id && self.session.session_date >= today)
            .count();
        Ok((committed + staged) as i64)
    }

    async fn has_confirmed_reservation(&mut self, member_id: MemberId) -> AppResult<bool> {
        let data = self.inner.data.lock().await;
        let committed = data.reservations.values().any(|r| {
            r.session_id == self.session.session_id
                && r.member_id == member_id
                && r.status == ReservationStatus::Confirmed
        });
        Ok(committed || self.staged_confirmed().any(|r| r.member_id == member_id))
    }

    async fn prior_confirmed_count(&mut self, member_id: MemberId) -> AppResult<i64> {
        let data = self.inner.data.lock().await;
        let committed = data
            .reservations
            .values()
            .filter(|r| r.member_id == member_id && r.status == ReservationStatus::Confirmed)
            .count();
        let staged = self
            .staged_confirmed()
            .filter(|r| r.member_id == member_id)
            .count();
        Ok((committed + staged) as i64)
    }

    async fn insert_reservation(&mut self, event: CreateReservation) -> AppResult<Reservation> {
        if event.status == ReservationStatus::Confirmed {
            // Last line of defense, counted under the session lock.
            let confirmed = self.confirmed_count().await?;
            if self.session.seats_remaining(confirmed) == 0 {
                return Err(AppError::CapacityExceeded(
                    "the class filled up while processing this request".into(),
                ));
            }
            if self.has_confirmed_reservation(event.member_id).await? {
                // Same guarantee as the partial unique index in Postgres.
                return Err(AppError::DuplicateEntry(
                    "you already have a reservation for this class".into(),
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
        self.staged.push(Staged::Reservation(reservation.clone()));
        Ok(reservation)
    }

    async fn waitlist_contains(&mut self, member_id: MemberId) -> AppResult<bool> {
        let data = self.inner.data.lock().await;
        let committed = data
            .waitlist
            .values()
            .any(|e| e.session_id == self.session.session_id && e.member_id == member_id);
        Ok(committed || self.staged_waitlist().any(|e| e.member_id == member_id))
    }

    async fn insert_waitlist_entry(
        &mut self,
        event: CreateWaitlistEntry,
    ) -> AppResult<WaitlistEntry> {
        if self.waitlist_contains(event.member_id).await? {
            return Err(AppError::DuplicateEntry(
                "you are already on the waitlist for this class".into(),
            ));
        }
        let entry = WaitlistEntry {
            entry_id: WaitlistEntryId::new(),
            session_id: self.session.session_id,
            member_id: event.member_id,
            priority: event.priority,
            registered_at: event.registered_at,
            notified: false,
        };
        self.staged.push(Staged::WaitlistEntry(entry.clone()));
        Ok(entry)
    }

    async fn next_waitlist_entry(&mut self) -> AppResult<Option<WaitlistEntry>> {
        let staged_notified: Vec<WaitlistEntryId> = self
            .staged
            .iter()
            .filter_map(|w| match w {
                Staged::Notified(id) => Some(*id),
                _ => None,
            })
            .collect();
        let data = self.inner.data.lock().await;
        Ok(data
            .waitlist
            .values()
            .filter(|e| {
                e.session_id == self.session.session_id
                    && !e.notified
                    && !staged_notified.contains(&e.entry_id)
            })
            .min_by(|a, b| promotion_order(a, b))
            .cloned())
    }

    async fn mark_notified(&mut self, entry_id: WaitlistEntryId) -> AppResult<()> {
        let committed = {
            let data = self.inner.data.lock().await;
            data.waitlist.contains_key(&entry_id)
        };
        let exists = committed || self.staged_waitlist().any(|e| e.entry_id == entry_id);
        if !exists {
            return Err(AppError::NoRowsAffectedError(
                "no waitlist entry has been updated".into(),
            ));
        }
        self.staged.push(Staged::Notified(entry_id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut data = self.inner.data.lock().await;
        for write in self.staged {
            match write {
                Staged::Reservation(r) => {
                    data.reservations.insert(r.reservation_id, r);
                }
                Staged::WaitlistEntry(e) => {
                    data.waitlist.insert(e.entry_id, e);
                }
                Staged::Notified(entry_id) => {
                    if let Some(e) = data.waitlist.get_mut(&entry_id) {
                        e.notified = true;
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, session: &ClassSession) -> AppResult<()> {
        self.add_session(session.clone()).await;
        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AppResult<Option<ClassSession>> {
        let data = self.inner.data.lock().await;
        Ok(data.sessions.get(&session_id).cloned())
    }

    async fn find_scheduled_in_room(&self, room_id: RoomId) -> AppResult<Vec<ClassSession>> {
        let data = self.inner.data.lock().await;
        Ok(data
            .sessions
            .values()
            .filter(|s| s.room_id == Some(room_id) && s.status == SessionStatus::Scheduled)
            .cloned()
            .collect())
    }

    async fn search_upcoming(
        &self,
        filter: &SessionFilter,
        today: NaiveDate,
    ) -> AppResult<Vec<SessionOccupancy>> {
        let data = self.inner.data.lock().await;
        let mut occupancies: Vec<SessionOccupancy> = data
            .sessions
            .values()
            .filter(|s| s.status == SessionStatus::Scheduled)
            .filter(|s| s.session_date >= today)
            .filter(|s| filter.kind.is_none_or(|k| s.kind == k))
            .filter(|s| filter.date.is_none_or(|d| s.session_date == d))
            .filter(|s| {
                filter
                    .instructor_id
                    .is_none_or(|i| s.instructor_id == Some(i))
            })
            .map(|s| SessionOccupancy {
                session: s.clone(),
                confirmed_count: confirmed_count_of(&data, s.session_id),
            })
            .collect();
        occupancies.sort_by_key(|o| (o.session.session_date, o.session.start_time));
        Ok(occupancies)
    }

    async fn occupancy(&self, session_id: SessionId) -> AppResult<Option<SessionOccupancy>> {
        let data = self.inner.data.lock().await;
        Ok(data.sessions.get(&session_id).map(|s| SessionOccupancy {
            session: s.clone(),
            confirmed_count: confirmed_count_of(&data, session_id),
        }))
    }

    async fn find_room(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let data = self.inner.data.lock().await;
        Ok(data.rooms.get(&room_id).cloned())
    }

    async fn find_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> AppResult<Option<Instructor>> {
        let data = self.inner.data.lock().await;
        Ok(data.instructors.get(&instructor_id).cloned())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn record(
        &self,
        event: RecordAttendance,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<Attendance> {
        let mut data = self.inner.data.lock().await;
        if !data.reservations.contains_key(&event.reservation_id) {
            return Err(AppError::EntityNotFound("reservation not found".into()));
        }
        if data
            .attendances
            .values()
            .any(|a| a.reservation_id == event.reservation_id)
        {
            return Err(AppError::DuplicateEntry(
                "attendance has already been recorded for this reservation".into(),
            ));
        }
        let attendance = Attendance {
            attendance_id: AttendanceId::new(),
            reservation_id: event.reservation_id,
            attended: event.attended,
            recorded_at,
            notes: event.notes,
        };
        data.attendances
            .insert(attendance.attendance_id, attendance.clone());
        Ok(attendance)
    }

    async fn no_show_rows(&self, range: DateRange) -> AppResult<Vec<NoShowRow>> {
        let data = self.inner.data.lock().await;
        let mut rows: Vec<NoShowRow> = data
            .attendances
            .values()
            .filter(|a| !a.attended)
            .filter_map(|a| {
                let reservation = data.reservations.get(&a.reservation_id)?;
                let session = data.sessions.get(&reservation.session_id)?;
                if session.session_date < range.from || session.session_date > range.to {
                    return None;
                }
                let member = data.members.get(&reservation.member_id)?;
                Some(NoShowRow {
                    member_id: member.member_id,
                    member_name: member.name.clone(),
                    session_id: session.session_id,
                    session_name: session.name.clone(),
                    kind: session.kind,
                    session_date: session.session_date,
                    start_time: session.start_time,
                })
            })
            .collect();
        rows.sort_by_key(|r| (r.session_date, r.start_time));
        Ok(rows)
    }

    async fn attendance_tallies(&self, range: DateRange) -> AppResult<Vec<AttendanceTally>> {
        let data = self.inner.data.lock().await;
        let mut sessions: Vec<&ClassSession> = data
            .sessions
            .values()
            .filter(|s| s.session_date >= range.from && s.session_date <= range.to)
            .collect();
        sessions.sort_by_key(|s| (s.session_date, s.start_time));
        let tallies = sessions
            .into_iter()
            .map(|s| {
                let total_reservations = confirmed_count_of(&data, s.session_id);
                let outcomes: Vec<bool> = data
                    .attendances
                    .values()
                    .filter(|a| {
                        data.reservations
                            .get(&a.reservation_id)
                            .is_some_and(|r| r.session_id == s.session_id)
                    })
                    .map(|a| a.attended)
                    .collect();
                AttendanceTally {
                    session_id: s.session_id,
                    session_name: s.name.clone(),
                    session_date: s.session_date,
                    total_reservations,
                    total_attended: outcomes.iter().filter(|attended| **attended).count() as i64,
                    total_no_shows: outcomes.iter().filter(|attended| !**attended).count() as i64,
                }
            })
            .collect();
        Ok(tallies)
    }
}

fn confirmed_count_of(data: &StoreData, session_id: SessionId) -> i64 {
    data.reservations
        .values()
        .filter(|r| r.session_id == session_id && r.status == ReservationStatus::Confirmed)
        .count() as i64
}
