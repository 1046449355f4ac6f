//! Relay worker that owns the privileged side of the request/commit split.
//!
//! Receives raw envelopes from the relay channel, decodes them, and hands
//! them to [`EncounterScheduler::handle_relay`]. A bad envelope never stops
//! the loop.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, info, warn};

use crate::api::RuntimeError;
use crate::scheduler::EncounterScheduler;

/// Background task that processes relayed advance requests.
pub struct RelayWorker {
    scheduler: Arc<EncounterScheduler>,
    relay_rx: broadcast::Receiver<String>,
    shutdown_rx: oneshot::Receiver<()>,
}

impl RelayWorker {
    pub fn new(
        scheduler: Arc<EncounterScheduler>,
        relay_rx: broadcast::Receiver<String>,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            scheduler,
            relay_rx,
            shutdown_rx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        info!("RelayWorker started");
        loop {
            tokio::select! {
                _ = &mut self.shutdown_rx => {
                    debug!("RelayWorker received shutdown");
                    break;
                }
                received = self.relay_rx.recv() => match received {
                    Ok(raw) => self.handle(&raw),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "RelayWorker lagged behind; requests dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("relay channel closed");
                        break;
                    }
                },
            }
        }
        info!("RelayWorker stopped");
    }

    fn handle(&self, raw: &str) {
        match self.scheduler.handle_raw(raw) {
            Ok(outcome) => debug!(?outcome, "relay request handled"),
            Err(RuntimeError::MalformedMessage(reason)) => {
                error!(%reason, "dropping malformed relay message");
            }
            Err(error) => error!(%error, "relay request failed"),
        }
    }
}
