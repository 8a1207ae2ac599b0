use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::{Message, Utf8Bytes};
use flower_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One open browser connection.
pub struct WsConnection {
    /// Outbound messages for this connection.
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Registry of open WebSocket connections.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` and shared between the
/// upgrade handler, the heartbeat task and the simulator.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection and return the receiver its sender task drains.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Send a message to every connection, returning how many accepted it.
    ///
    /// Closed channels are skipped; their entries go away when the receive
    /// loop notices the disconnect.
    pub async fn broadcast(&self, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Broadcast a JSON text frame.
    pub async fn broadcast_text(&self, text: String) -> usize {
        self.broadcast(Message::Text(Utf8Bytes::from(text))).await
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connection.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_open_connection() {
        let manager = WsManager::new();
        let mut a = manager.add("a".into()).await;
        let mut b = manager.add("b".into()).await;

        let sent = manager.broadcast_text(r#"{"event":"x"}"#.into()).await;

        assert_eq!(sent, 2);
        assert_matches!(a.recv().await, Some(Message::Text(t)) if t.as_str() == r#"{"event":"x"}"#);
        assert_matches!(b.recv().await, Some(Message::Text(_)));
    }

    #[tokio::test]
    async fn dropped_receivers_are_skipped() {
        let manager = WsManager::new();
        let _kept = manager.add("kept".into()).await;
        drop(manager.add("gone".into()).await);

        assert_eq!(manager.broadcast_text("{}".into()).await, 1);
        assert_eq!(manager.connection_count().await, 2);

        manager.remove("gone").await;
        assert_eq!(manager.connection_count().await, 1);
    }

    #[tokio::test]
    async fn shutdown_sends_close_and_clears() {
        let manager = WsManager::new();
        let mut rx = manager.add("a".into()).await;

        manager.shutdown_all().await;

        assert_matches!(rx.recv().await, Some(Message::Close(None)));
        assert_eq!(manager.connection_count().await, 0);
    }
}
