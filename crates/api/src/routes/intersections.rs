//! Route definitions for the `/intersections` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::intersections;
use crate::state::AppState;

/// Routes mounted at `/intersections`.
///
/// ```text
/// GET /                         -> list
/// GET /{id}                     -> detail
/// GET /{id}/stats/volume        -> volume
/// GET /{id}/stats/flow          -> flow
/// GET /{id}/semaphores/current  -> semaphores_current
/// GET /{id}/schedule            -> schedule
/// GET /{id}/history             -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(intersections::list))
        .route("/{id}", get(intersections::detail))
        .route("/{id}/stats/volume", get(intersections::volume))
        .route("/{id}/stats/flow", get(intersections::flow))
        .route(
            "/{id}/semaphores/current",
            get(intersections::semaphores_current),
        )
        .route("/{id}/schedule", get(intersections::schedule))
        .route("/{id}/history", get(intersections::history))
}
