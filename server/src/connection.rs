use std::fmt;

use shared::protocol::ServerMessage;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionID(u64);

impl ConnectionID {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a live connection: its identity plus the outbound queue
/// drained by that connection's task.
///
/// The queue is unbounded so enqueueing never waits on the peer's socket.
/// Once the connection task exits, the receiving half is dropped and the
/// handle reports itself as no longer open.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionID,
    outbound_tx: UnboundedSender<ServerMessage>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionID, outbound_tx: UnboundedSender<ServerMessage>) -> Self {
        Self { id, outbound_tx }
    }

    pub fn id(&self) -> ConnectionID {
        self.id
    }

    pub fn is_open(&self) -> bool {
        !self.outbound_tx.is_closed()
    }

    /// Best-effort enqueue. Returns false if the connection is gone.
    pub fn send(&self, message: ServerMessage) -> bool {
        self.outbound_tx.send(message).is_ok()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}
