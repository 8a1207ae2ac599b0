use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(analytics::dashboard))
        .route("/traffic-flow", get(analytics::traffic_flow))
        .route("/congestion-trends", get(analytics::congestion_trends))
}
