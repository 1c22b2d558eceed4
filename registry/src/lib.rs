use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::attendance::AttendanceRepositoryImpl;
use adapter::repository::booking::BookingRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::session::SessionRepositoryImpl;
use kernel::clock::{Clock, SystemClock};
use kernel::notifier::{LogNotifier, Notifier};
use kernel::repository::attendance::AttendanceRepository;
use kernel::repository::booking::BookingRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::session::SessionRepository;
use kernel::service::attendance::AttendanceService;
use kernel::service::availability::AvailabilityService;
use kernel::service::booking::BookingService;
use kernel::service::catalog::CatalogService;
use kernel::service::waitlist::WaitlistService;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    booking_service: Arc<BookingService>,
    waitlist_service: Arc<WaitlistService>,
    availability_service: Arc<AvailabilityService>,
    catalog_service: Arc<CatalogService>,
    attendance_service: Arc<AttendanceService>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let booking_repository: Arc<dyn BookingRepository> =
            Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(SessionRepositoryImpl::new(pool.clone()));
        let attendance_repository: Arc<dyn AttendanceRepository> =
            Arc::new(AttendanceRepositoryImpl::new(pool));

        let waitlist_service = Arc::new(WaitlistService::new(
            booking_repository.clone(),
            clock.clone(),
            notifier,
            app_config.booking.clone(),
        ));
        let booking_service = Arc::new(BookingService::new(
            booking_repository,
            session_repository.clone(),
            waitlist_service.clone(),
            clock.clone(),
            app_config.booking.clone(),
        ));
        let availability_service = Arc::new(AvailabilityService::new(
            session_repository.clone(),
            clock.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(session_repository, clock.clone()));
        let attendance_service = Arc::new(AttendanceService::new(attendance_repository, clock));

        Self {
            health_check_repository,
            booking_service,
            waitlist_service,
            availability_service,
            catalog_service,
            attendance_service,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn booking_service(&self) -> Arc<BookingService> {
        self.booking_service.clone()
    }

    pub fn waitlist_service(&self) -> Arc<WaitlistService> {
        self.waitlist_service.clone()
    }

    pub fn availability_service(&self) -> Arc<AvailabilityService> {
        self.availability_service.clone()
    }

    pub fn catalog_service(&self) -> Arc<CatalogService> {
        self.catalog_service.clone()
    }

    pub fn attendance_service(&self) -> Arc<AttendanceService> {
        self.attendance_service.clone()
    }
}
