//! Public-transport schedule rules.

/// A stop lasting at least this many minutes counts as delayed.
pub const DELAY_THRESHOLD_MINUTES: i32 = 3;

/// Whether a stop of `stopped_minutes` is shown as delayed.
///
/// Purely a presentation rule; nothing about the delay is persisted.
pub fn is_delayed(stopped_minutes: i32) -> bool {
    stopped_minutes >= DELAY_THRESHOLD_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(!is_delayed(2));
        assert!(is_delayed(3));
        assert!(is_delayed(9));
    }

    #[test]
    fn zero_minutes_is_on_time() {
        assert!(!is_delayed(0));
    }
}
