use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    reservation::reserve_session,
    session::{schedule_session, show_session_availability, show_session_list},
    waitlist::{join_waitlist, promote_waitlist},
};

pub fn build_session_routers() -> Router<AppRegistry> {
    let sessions_routers = Router::new()
        .route("/", post(schedule_session))
        .route("/", get(show_session_list))
        .route("/:session_id/availability", get(show_session_availability))
        .route("/:session_id/reservations", post(reserve_session))
        .route("/:session_id/waitlist", post(join_waitlist))
        .route("/:session_id/waitlist/promote", post(promote_waitlist));

    Router::new().nest("/sessions", sessions_routers)
}
