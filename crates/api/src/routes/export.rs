use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/intersections/csv", get(export::intersections))
        .route("/traffic/csv", get(export::traffic))
}
