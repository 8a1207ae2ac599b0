use axum::routing::get;
use axum::Router;

use crate::handlers::comparison;
use crate::state::AppState;

/// Routes mounted at `/comparison`.
pub fn router() -> Router<AppState> {
    Router::new().route("/intersections", get(comparison::intersections))
}
