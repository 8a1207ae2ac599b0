pub mod analytics;
pub mod comparison;
pub mod export;
pub mod health;
pub mod intersections;
pub mod reports;
pub mod signup;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                        WebSocket (vehicle updates)
///
/// /signup/register                           register (public, rate limited)
/// /signup/login                              login (public, rate limited)
/// /signup/me                                 current user (bearer)
/// /signup/account                            delete account (bearer)
/// /signup/logout                             advisory logout (public)
///
/// /intersections                             list
/// /intersections/{id}                        detail with semaphores and stations
/// /intersections/{id}/stats/volume           crossings per class (?days)
/// /intersections/{id}/stats/flow             crossings per minute (?minutes)
/// /intersections/{id}/semaphores/current     latest color per semaphore
/// /intersections/{id}/schedule               public-transport stops (?days)
/// /intersections/{id}/history                one-day summary (?date)
///
/// /reports/congestion                        delayed stops (?days, ?limit)
/// /reports/violations                        red-light crossings (?days, ?limit)
///
/// /analytics/dashboard                       headline numbers (?days)
/// /analytics/traffic-flow                    crossings per day (?days)
/// /analytics/congestion-trends               delays per day (?days)
///
/// /comparison/intersections                  side-by-side volumes (?ids)
///
/// /export/intersections/csv                  intersection inventory
/// /export/traffic/csv                        crossings (?startDate, ?endDate)
/// ```
///
/// Everything outside `/signup` and `/ws` requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/signup", signup::router())
        .nest("/intersections", intersections::router())
        .nest("/reports", reports::router())
        .nest("/analytics", analytics::router())
        .nest("/comparison", comparison::router())
        .nest("/export", export::router())
}
