//! WebSocket push channel for live vehicle positions.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler mounted at `/api/ws`.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
