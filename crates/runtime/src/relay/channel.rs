//! Best-effort transport for relay envelopes.

use tokio::sync::broadcast;

use crate::api::{Result, RuntimeError};

use super::RelayMessage;

/// Channel that carries relay envelopes to the privileged party.
///
/// Delivery is best-effort: no ordering, no acknowledgement.
pub trait RelayChannel: Send + Sync {
    fn send(&self, message: &RelayMessage) -> Result<()>;
}

/// In-process relay backed by a tokio broadcast channel of JSON strings.
///
/// Every party holding a clone of the sender can publish; the privileged
/// party's relay worker subscribes and decodes.
#[derive(Clone)]
pub struct BroadcastRelay {
    sender: broadcast::Sender<String>,
}

impl BroadcastRelay {
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Sends an already encoded envelope as-is.
    pub fn send_raw(&self, raw: impl Into<String>) -> Result<()> {
        self.sender
            .send(raw.into())
            .map(|_| ())
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

impl Default for BroadcastRelay {
    fn default() -> Self {
        Self::new(32)
    }
}

impl RelayChannel for BroadcastRelay {
    fn send(&self, message: &RelayMessage) -> Result<()> {
        self.send_raw(message.encode()?)
    }
}
