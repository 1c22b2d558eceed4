//! Shared fixtures: an in-memory store wired into the full service
//! stack, with a pinned clock so cutoff and tenure arithmetic is
//! deterministic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tokio::sync::Mutex;

use adapter::memory::InMemoryStore;
use kernel::clock::{Clock, FixedClock};
use kernel::model::id::{InstructorId, MemberId, RoomId, SessionId};
use kernel::model::instructor::Instructor;
use kernel::model::member::{Member, MembershipStatus};
use kernel::model::room::Room;
use kernel::model::session::{ClassKind, ClassSession, SessionStatus};
use kernel::notifier::Notifier;
use kernel::repository::attendance::AttendanceRepository;
use kernel::repository::booking::BookingRepository;
use kernel::repository::session::SessionRepository;
use kernel::service::attendance::AttendanceService;
use kernel::service::availability::AvailabilityService;
use kernel::service::booking::BookingService;
use kernel::service::catalog::CatalogService;
use kernel::service::waitlist::WaitlistService;
use shared::config::BookingConfig;

/// 2026-08-20 12:00 UTC, a Thursday. All fixture dates are relative
/// to this instant.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
}

/// An active member who joined the given number of days before
/// [`fixed_now`], so their tenure part of the priority score is
/// exactly that number.
pub fn member(name: &str, tenure_days: i64) -> Member {
    let joined_at = fixed_now() - Duration::days(tenure_days);
    Member {
        member_id: MemberId::new(),
        member_number: format!("M-{tenure_days:04}"),
        name: name.into(),
        joined_at,
        membership_start: joined_at.date_naive(),
        membership_end: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
        status: MembershipStatus::Active,
    }
}

/// A scheduled session starting the given number of hours after
/// [`fixed_now`].
pub fn session_in_hours(hours_ahead: i64, capacity: i32) -> ClassSession {
    let starts = fixed_now() + Duration::hours(hours_ahead);
    ClassSession {
        session_id: SessionId::new(),
        name: "Evening Spin".into(),
        description: String::new(),
        kind: ClassKind::Spinning,
        session_date: starts.date_naive(),
        start_time: starts.time(),
        duration_minutes: 60,
        capacity,
        instructor_id: None,
        instructor_name: "Sam".into(),
        room_id: None,
        price_cents: 1800,
        status: SessionStatus::Scheduled,
    }
}

pub fn instructor(name: &str) -> Instructor {
    Instructor {
        instructor_id: InstructorId::new(),
        name: name.into(),
        specialties: "spinning, strength".into(),
    }
}

pub fn room(name: &str, capacity: i32) -> Room {
    Room {
        room_id: RoomId::new(),
        name: name.into(),
        capacity,
    }
}

/// Captures promotion notifications instead of logging them.
#[derive(Default)]
pub struct RecordingNotifier {
    promoted: Mutex<Vec<(MemberId, SessionId)>>,
}

impl RecordingNotifier {
    pub async fn promotions(&self) -> Vec<(MemberId, SessionId)> {
        self.promoted.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn promoted(&self, member_id: MemberId, session: &ClassSession) {
        self.promoted
            .lock()
            .await
            .push((member_id, session.session_id));
    }
}

/// The full service stack over one shared [`InMemoryStore`].
pub struct App {
    pub now: DateTime<Utc>,
    pub store: InMemoryStore,
    pub notifier: Arc<RecordingNotifier>,
    pub booking: BookingService,
    pub waitlist: Arc<WaitlistService>,
    pub availability: AvailabilityService,
    pub catalog: CatalogService,
    pub attendance: AttendanceService,
}

pub fn app() -> App {
    app_with(BookingConfig::default())
}

pub fn app_with(config: BookingConfig) -> App {
    let now = fixed_now();
    let store = InMemoryStore::new();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));
    let notifier = Arc::new(RecordingNotifier::default());

    let bookings: Arc<dyn BookingRepository> = Arc::new(store.clone());
    let sessions: Arc<dyn SessionRepository> = Arc::new(store.clone());
    let attendances: Arc<dyn AttendanceRepository> = Arc::new(store.clone());

    let waitlist = Arc::new(WaitlistService::new(
        Arc::clone(&bookings),
        Arc::clone(&clock),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        config.clone(),
    ));
    let booking = BookingService::new(
        Arc::clone(&bookings),
        Arc::clone(&sessions),
        Arc::clone(&waitlist),
        Arc::clone(&clock),
        config,
    );
    let availability = AvailabilityService::new(Arc::clone(&sessions), Arc::clone(&clock));
    let catalog = CatalogService::new(Arc::clone(&sessions), Arc::clone(&clock));
    let attendance = AttendanceService::new(attendances, Arc::clone(&clock));

    App {
        now,
        store,
        notifier,
        booking,
        waitlist,
        availability,
        catalog,
        attendance,
    }
}

/// A variant of [`app`] whose booking service hands promotions to a
/// waitlist service backed by a store that refuses to open
/// transactions. Joining the waitlist still works through
/// `App::waitlist`; every promotion triggered by a cancellation fails.
pub fn app_with_broken_promotions() -> App {
    let now = fixed_now();
    let store = InMemoryStore::new();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));
    let notifier = Arc::new(RecordingNotifier::default());
    let config = BookingConfig::default();

    let bookings: Arc<dyn BookingRepository> = Arc::new(store.clone());
    let sessions: Arc<dyn SessionRepository> = Arc::new(store.clone());
    let attendances: Arc<dyn AttendanceRepository> = Arc::new(store.clone());

    let waitlist = Arc::new(WaitlistService::new(
        Arc::clone(&bookings),
        Arc::clone(&clock),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        config.clone(),
    ));
    let broken_waitlist = Arc::new(WaitlistService::new(
        Arc::new(broken::BrokenStore),
        Arc::clone(&clock),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        config.clone(),
    ));
    let booking = BookingService::new(
        Arc::clone(&bookings),
        Arc::clone(&sessions),
        broken_waitlist,
        Arc::clone(&clock),
        config,
    );
    let availability = AvailabilityService::new(Arc::clone(&sessions), Arc::clone(&clock));
    let catalog = CatalogService::new(Arc::clone(&sessions), Arc::clone(&clock));
    let attendance = AttendanceService::new(attendances, Arc::clone(&clock));

    App {
        now,
        store,
        notifier,
        booking,
        waitlist,
        availability,
        catalog,
        attendance,
    }
}

mod broken {
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use kernel::model::id::{MemberId, ReservationId, SessionId};
    use kernel::model::reservation::{MemberBooking, Reservation};
    use kernel::repository::booking::{BookingRepository, SessionTx};
    use shared::error::{AppError, AppResult};

    pub struct BrokenStore;

    #[async_trait]
    impl BookingRepository for BrokenStore {
        async fn begin_session(
            &self,
            _session_id: SessionId,
        ) -> AppResult<Option<Box<dyn SessionTx>>> {
            Err(AppError::TransactionError(sqlx::Error::PoolClosed))
        }

        async fn find_reservation_for_member(
            &self,
            _reservation_id: ReservationId,
            _member_id: MemberId,
        ) -> AppResult<Option<Reservation>> {
            Err(AppError::TransactionError(sqlx::Error::PoolClosed))
        }

        async fn mark_cancelled(
            &self,
            _reservation_id: ReservationId,
            _cancelled_at: DateTime<Utc>,
        ) -> AppResult<bool> {
            Err(AppError::TransactionError(sqlx::Error::PoolClosed))
        }

        async fn reservations_for_member(
            &self,
            _member_id: MemberId,
            _today: NaiveDate,
        ) -> AppResult<Vec<MemberBooking>> {
            Err(AppError::TransactionError(sqlx::Error::PoolClosed))
        }
    }
}
