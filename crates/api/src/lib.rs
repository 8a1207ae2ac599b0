//! Traffic Flower API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! WebSocket push channel, vehicle simulator) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod simulator;
pub mod state;
pub mod ws;
