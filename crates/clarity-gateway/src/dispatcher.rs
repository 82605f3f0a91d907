use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use clarity_types::events::StreamEvent;

/// Events a slow subscriber may fall behind by before it starts skipping.
const BROADCAST_CAPACITY: usize = 1024;

/// Tracks connected stream clients and fans events out to all of them.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// Broadcast channel for stream events; every connected client receives every event
    broadcast_tx: broadcast::Sender<StreamEvent>,

    /// Ids of the currently open stream connections
    connections: RwLock<HashSet<Uuid>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(DispatcherInner {
                broadcast_tx,
                connections: RwLock::new(HashSet::new()),
            }),
        }
    }

    /// Subscribe to stream events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients. Returns how many
    /// receivers it reached; zero when nobody is listening.
    pub fn broadcast(&self, event: StreamEvent) -> usize {
        self.inner.broadcast_tx.send(event).unwrap_or(0)
    }

    /// Register a new connection. Returns its id.
    pub async fn register_connection(&self) -> Uuid {
        let conn_id = Uuid::new_v4();
        self.inner.connections.write().await.insert(conn_id);
        conn_id
    }

    pub async fn unregister_connection(&self, conn_id: Uuid) {
        self.inner.connections.write().await.remove(&conn_id);
    }

    /// Number of open stream connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.connections.read().await.len()
    }
}
