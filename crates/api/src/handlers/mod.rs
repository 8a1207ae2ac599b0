pub mod analytics;
pub mod comparison;
pub mod export;
pub mod intersections;
pub mod reports;
pub mod signup;
