//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` entity structs matching database rows
//! - `Create*` DTOs for inserts
//! - `Serialize` projections returned by the read path (camelCase on the wire)

pub mod event;
pub mod intersection;
pub mod report;
pub mod traffic;
pub mod user;
pub mod vehicle;
