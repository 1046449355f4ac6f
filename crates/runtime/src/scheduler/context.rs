//! Explicit collaborators handed to a scheduler.

use std::sync::Arc;

use initiative_core::{AttributeOracle, DiceOracle, EncounterEnv, EncounterId, InitiativeConfig};

use crate::events::EventBus;
use crate::relay::{Privilege, RelayChannel};
use crate::repository::EncounterRepository;

use super::EncounterLocks;

/// Host hook invoked after a round advance is committed.
pub trait RoundClock: Send + Sync {
    fn on_round_advanced(&self, encounter: &EncounterId, round: u32) {
        let _ = (encounter, round);
    }
}

/// Round clock that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClock;

impl RoundClock for NoopClock {}

/// Everything a scheduler reads or writes, injected instead of looked up.
#[derive(Clone)]
pub struct SchedulerContext {
    pub store: Arc<dyn EncounterRepository>,
    pub channel: Arc<dyn RelayChannel>,
    pub dice: Arc<dyn DiceOracle>,
    pub attributes: Arc<dyn AttributeOracle>,
    pub config: InitiativeConfig,
    pub privilege: Arc<dyn Privilege>,
    pub clock: Arc<dyn RoundClock>,
    pub events: EventBus,
    /// Serializes load, transition, and save per encounter.
    pub locks: EncounterLocks,
}

impl SchedulerContext {
    pub fn new(
        store: Arc<dyn EncounterRepository>,
        channel: Arc<dyn RelayChannel>,
        dice: Arc<dyn DiceOracle>,
        attributes: Arc<dyn AttributeOracle>,
        privilege: Arc<dyn Privilege>,
    ) -> Self {
        Self {
            store,
            channel,
            dice,
            attributes,
            config: InitiativeConfig::default(),
            privilege,
            clock: Arc::new(NoopClock),
            events: EventBus::new(),
            locks: EncounterLocks::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: InitiativeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn RoundClock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Joins an existing lock table, e.g. one owned by another context over
    /// the same store.
    #[must_use]
    pub fn with_locks(mut self, locks: EncounterLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Same collaborators seen by a party with a different privilege.
    #[must_use]
    pub fn with_privilege(mut self, privilege: Arc<dyn Privilege>) -> Self {
        self.privilege = privilege;
        self
    }

    pub fn env(&self) -> EncounterEnv<'_> {
        EncounterEnv::new(self.attributes.as_ref(), self.dice.as_ref(), &self.config)
    }
}
