//! Periodic pruning of idle rate-limiter keys.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::middleware::rate_limit::RateLimiter;

/// How often idle keys are dropped.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Drop keys with no requests left in their window from every limiter.
/// Runs until `cancel` is triggered.
pub async fn run(limiters: Vec<RateLimiter>, cancel: CancellationToken) {
    tracing::info!(
        limiters = limiters.len(),
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Rate limiter cleanup started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Rate limiter cleanup stopping");
                break;
            }
            _ = interval.tick() => {
                for limiter in &limiters {
                    limiter.cleanup().await;
                }
                tracing::debug!("Rate limiter cleanup: pruned idle keys");
            }
        }
    }
}
