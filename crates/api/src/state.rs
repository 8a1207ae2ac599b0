use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flower_db::DbPool,
    /// Server configuration (JWT secret, hashing cost, limits).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Rolling-window limiter for `POST /signup/login`.
    pub login_limiter: RateLimiter,
    /// Rolling-window limiter for `POST /signup/register`.
    pub register_limiter: RateLimiter,
}

impl AppState {
    /// Build the state, sizing both limiters from `config.rate_limit`.
    pub fn new(pool: flower_db::DbPool, config: ServerConfig, ws_manager: Arc<WsManager>) -> Self {
        let limits = &config.rate_limit;
        let login_limiter = RateLimiter::new(limits.login_max, limits.window_secs);
        let register_limiter = RateLimiter::new(limits.register_max, limits.window_secs);
        Self {
            pool,
            config: Arc::new(config),
            ws_manager,
            login_limiter,
            register_limiter,
        }
    }
}
