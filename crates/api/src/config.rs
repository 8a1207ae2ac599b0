use crate::auth::jwt::JwtConfig;
use crate::auth::password::PasswordConfig;

/// Read an env var and parse it, falling back to `default` when unset.
///
/// Panics with `"{key} must be a valid {ty}"` on an unparseable value so a
/// misconfigured deployment fails at startup.
fn env_or<T: std::str::FromStr>(key: &str, default: T, ty: &str) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {ty}")),
        Err(_) => default,
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token signing and lifetime.
    pub jwt: JwtConfig,
    /// Password hashing cost.
    pub password: PasswordConfig,
    /// Per-client limits on the signup endpoints.
    pub rate_limit: RateLimitSettings,
    /// Vehicle-position simulator.
    pub simulator: SimulatorConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                        |
    /// |------------------------|------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                      |
    /// | `PORT`                 | `5001`                                         |
    /// | `CORS_ORIGINS`         | `http://localhost:5173,http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 5001, "u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30, "u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            password: PasswordConfig::from_env(),
            rate_limit: RateLimitSettings::from_env(),
            simulator: SimulatorConfig::from_env(),
        }
    }
}

/// Request budgets for the rolling-window limiters on `/api/signup`.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// Login attempts per client per window (default: `20`).
    pub login_max: usize,
    /// Registration attempts per client per window (default: `6`).
    pub register_max: usize,
    /// Window length in seconds (default: `60`).
    pub window_secs: u64,
    /// Key clients on the first `X-Forwarded-For` hop instead of the socket
    /// peer (default: `false`). Enable only behind a proxy that sets it.
    pub trust_proxy: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            login_max: 20,
            register_max: 6,
            window_secs: 60,
            trust_proxy: false,
        }
    }
}

impl RateLimitSettings {
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `LOGIN_RATE_LIMIT`       | `20`    |
    /// | `REGISTER_RATE_LIMIT`    | `6`     |
    /// | `RATE_LIMIT_WINDOW_SECS` | `60`    |
    /// | `TRUST_PROXY`            | `false` |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            login_max: env_or("LOGIN_RATE_LIMIT", defaults.login_max, "usize"),
            register_max: env_or("REGISTER_RATE_LIMIT", defaults.register_max, "usize"),
            window_secs: env_or("RATE_LIMIT_WINDOW_SECS", defaults.window_secs, "u64"),
            trust_proxy: env_or("TRUST_PROXY", defaults.trust_proxy, "bool"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub enabled: bool,
    /// Tick interval in milliseconds (default: `2000`).
    pub interval_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 2000,
        }
    }
}

impl SimulatorConfig {
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `SIMULATOR_ENABLED`     | `true`  |
    /// | `SIMULATOR_INTERVAL_MS` | `2000`  |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("SIMULATOR_ENABLED", defaults.enabled, "bool"),
            interval_ms: env_or("SIMULATOR_INTERVAL_MS", defaults.interval_ms, "u64"),
        }
    }
}
