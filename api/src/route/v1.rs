use super::{
    health::build_health_check_routers, report::build_report_routers,
    reservation::build_reservation_routers, session::build_session_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_session_routers())
        .merge(build_reservation_routers())
        .merge(build_report_routers());
    Router::new().nest("/api/v1", router)
}
