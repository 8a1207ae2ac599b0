//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod event_repo;
pub mod intersection_repo;
pub mod report_repo;
pub mod semaphore_repo;
pub mod station_repo;
pub mod traffic_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use event_repo::{ColorChangeRepo, CrossingRepo, StopRepo};
pub use intersection_repo::IntersectionRepo;
pub use report_repo::ReportRepo;
pub use semaphore_repo::SemaphoreRepo;
pub use station_repo::StationRepo;
pub use traffic_repo::TrafficRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
