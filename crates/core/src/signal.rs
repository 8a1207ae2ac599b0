//! Traffic-light colors recorded in `color_changes`.
//!
//! The `ck_color_changes_color` constraint admits exactly these three values.

pub const COLOR_RED: &str = "RED";
pub const COLOR_YELLOW: &str = "YELLOW";
pub const COLOR_GREEN: &str = "GREEN";

/// Reported for a semaphore that has no color-change history yet.
pub const DEFAULT_COLOR: &str = COLOR_GREEN;

/// Color that turns a crossing into a violation.
pub const VIOLATION_COLOR: &str = COLOR_RED;
