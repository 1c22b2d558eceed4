use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    report::record_attendance,
    reservation::{cancel_reservation, show_member_reservations},
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/:reservation_id/cancel", post(cancel_reservation))
        .route("/:reservation_id/attendance", post(record_attendance));

    let members_routers =
        Router::new().route("/:member_id/reservations", get(show_member_reservations));

    Router::new()
        .nest("/reservations", reservations_routers)
        .nest("/members", members_routers)
}
