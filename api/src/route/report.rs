use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::report::{attendance_report, no_show_report};

pub fn build_report_routers() -> Router<AppRegistry> {
    let reports_routers = Router::new()
        .route("/no-shows", get(no_show_report))
        .route("/attendance", get(attendance_report));

    Router::new().nest("/reports", reports_routers)
}
