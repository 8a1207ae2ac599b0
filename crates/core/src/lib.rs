//! Domain layer for the Traffic Flower backend.
//!
//! Holds everything that does not need a database or an HTTP stack: the
//! error taxonomy, identifier aliases, vehicle classes, signal colors,
//! registration rules, and the small time-window helpers used by the
//! aggregation read path.

pub mod error;
pub mod registration;
pub mod schedule;
pub mod signal;
pub mod timeline;
pub mod types;
pub mod vehicle;
