//! High-level runtime orchestrator.
//!
//! The runtime wires the shared store, relay channel, and event bus into an
//! [`EncounterScheduler`], and on the privileged party also owns the relay
//! worker that commits requests from everyone else.

use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use initiative_core::{AttributeOracle, DiceOracle, InitiativeConfig};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::relay::{BroadcastRelay, Privilege, Role};
use crate::repository::{EncounterRepository, InMemoryEncounterRepo};
use crate::scheduler::{EncounterScheduler, NoopClock, RoundClock, SchedulerContext};
use crate::workers::RelayWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub initiative: InitiativeConfig,
    pub event_buffer_size: usize,
    pub relay_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            initiative: InitiativeConfig::default(),
            event_buffer_size: 100,
            relay_buffer_size: 32,
        }
    }
}

/// Main runtime for one party of an encounter session.
pub struct Runtime {
    scheduler: Arc<EncounterScheduler>,
    relay: BroadcastRelay,

    // Background worker (privileged party only)
    relay_worker: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Scheduler of this party.
    pub fn scheduler(&self) -> Arc<EncounterScheduler> {
        Arc::clone(&self.scheduler)
    }

    /// Scheduler for another party sharing this runtime's store, relay, and
    /// events, e.g. a player seat next to the game master.
    pub fn party(&self, privilege: Arc<dyn Privilege>) -> EncounterScheduler {
        let ctx = self.scheduler.context().clone().with_privilege(privilege);
        EncounterScheduler::new(ctx)
    }

    pub fn relay(&self) -> &BroadcastRelay {
        &self.relay
    }

    pub fn events(&self) -> &EventBus {
        self.scheduler.events()
    }

    /// Subscribe to scheduler events on one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.scheduler.events().subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        if let Some((shutdown_tx, handle)) = self.relay_worker {
            // The worker may already have stopped on its own.
            let _ = shutdown_tx.send(());
            handle.await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn EncounterRepository>>,
    relay: Option<BroadcastRelay>,
    attributes: Option<Arc<dyn AttributeOracle>>,
    dice: Option<Arc<dyn DiceOracle>>,
    clock: Option<Arc<dyn RoundClock>>,
    privilege: Option<Arc<dyn Privilege>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            relay: None,
            attributes: None,
            dice: None,
            clock: None,
            privilege: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared document store (defaults to a fresh in-memory store)
    pub fn store(mut self, store: Arc<dyn EncounterRepository>) -> Self {
        self.store = Some(store);
        self
    }

    /// Relay channel shared with the other parties (defaults to a new one)
    pub fn relay(mut self, relay: BroadcastRelay) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Set required attribute oracle
    pub fn attributes(mut self, attributes: Arc<dyn AttributeOracle>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Set required dice oracle
    pub fn dice(mut self, dice: Arc<dyn DiceOracle>) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Host hook called after every committed round advance
    pub fn clock(mut self, clock: Arc<dyn RoundClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Privilege of this party (defaults to the game master)
    pub fn privilege(mut self, privilege: Arc<dyn Privilege>) -> Self {
        self.privilege = Some(privilege);
        self
    }

    /// Build the runtime
    ///
    /// Spawns the relay worker when this party is privileged, so it must be
    /// called from within a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let attributes = self
            .attributes
            .ok_or(RuntimeError::MissingCollaborator("attribute oracle"))?;
        let dice = self
            .dice
            .ok_or(RuntimeError::MissingCollaborator("dice oracle"))?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryEncounterRepo::new()) as Arc<dyn EncounterRepository>);
        let relay = self
            .relay
            .unwrap_or_else(|| BroadcastRelay::new(self.config.relay_buffer_size));
        let privilege = self
            .privilege
            .unwrap_or_else(|| Arc::new(Role::GameMaster) as Arc<dyn Privilege>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(NoopClock) as Arc<dyn RoundClock>);

        let ctx = SchedulerContext::new(
            store,
            Arc::new(relay.clone()),
            dice,
            attributes,
            privilege,
        )
        .with_config(self.config.initiative)
        .with_clock(clock)
        .with_events(EventBus::with_capacity(self.config.event_buffer_size));

        let scheduler = Arc::new(EncounterScheduler::new(ctx));

        let relay_worker = if scheduler.is_privileged() {
            let (shutdown_tx, shutdown_rx) = oneshot::channel();
            let worker = RelayWorker::new(Arc::clone(&scheduler), relay.subscribe(), shutdown_rx);
            let handle = tokio::spawn(async move {
                worker.run().await;
            });
            Some((shutdown_tx, handle))
        } else {
            None
        };

        Ok(Runtime {
            scheduler,
            relay,
            relay_worker,
        })
    }
}
