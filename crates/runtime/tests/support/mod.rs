#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use initiative_core::{
    ActorAttributes, ActorId, Combatant, CombatantId, Controller, EncounterId, EncounterState,
    InitiativeConfig, RoundState, ScriptedDice, StaticAttributes,
};
use runtime::{
    BroadcastRelay, EncounterLocks, EncounterRepository, EncounterScheduler,
    InMemoryEncounterRepo, Role, RoundClock, SchedulerContext,
};

pub const ENCOUNTER: &str = "bridge";

pub fn encounter_id() -> EncounterId {
    EncounterId::from(ENCOUNTER)
}

/// Actors 1..=4 share reaction + intuition = 5 and differ by edge.
pub fn attributes() -> Arc<StaticAttributes> {
    Arc::new(
        (1..=4)
            .map(|n| (ActorId(n), ActorAttributes::new(n as i32, 3, 2)))
            .collect(),
    )
}

pub fn npc(id: u32) -> Combatant {
    Combatant::new(CombatantId(id), ActorId(id), Controller::GameMaster)
}

pub fn player(id: u32) -> Combatant {
    Combatant::new(CombatantId(id), ActorId(id), Controller::Player)
}

/// Running encounter at round 1, pass 1 with the roster in the given order.
pub fn running(roster: impl IntoIterator<Item = Combatant>, turn: usize) -> EncounterState {
    let mut state = EncounterState::with_combatants(ENCOUNTER, roster);
    state.round = RoundState::new(1, 1, turn);
    state
}

/// Records every round advance the host is told about.
#[derive(Default)]
pub struct RecordingClock {
    pub rounds: Mutex<Vec<(EncounterId, u32)>>,
}

impl RoundClock for RecordingClock {
    fn on_round_advanced(&self, encounter: &EncounterId, round: u32) {
        self.rounds
            .lock()
            .unwrap()
            .push((encounter.clone(), round));
    }
}

/// One store, one relay, and one lock table shared by a game master and a
/// player.
pub struct Table {
    pub store: Arc<InMemoryEncounterRepo>,
    pub relay: BroadcastRelay,
    pub locks: EncounterLocks,
    pub dice: Arc<ScriptedDice>,
    pub clock: Arc<RecordingClock>,
    pub config: InitiativeConfig,
}

impl Table {
    pub fn new(state: EncounterState) -> Self {
        Self::with_config(state, InitiativeConfig::default())
    }

    pub fn with_config(state: EncounterState, config: InitiativeConfig) -> Self {
        Self {
            store: Arc::new(InMemoryEncounterRepo::with_encounters([state])),
            relay: BroadcastRelay::default(),
            locks: EncounterLocks::new(),
            dice: Arc::new(ScriptedDice::default()),
            clock: Arc::new(RecordingClock::default()),
            config,
        }
    }

    pub fn scheduler(&self, role: Role) -> EncounterScheduler {
        let ctx = SchedulerContext::new(
            self.store.clone(),
            Arc::new(self.relay.clone()),
            self.dice.clone(),
            attributes(),
            Arc::new(role),
        )
        .with_config(self.config.clone())
        .with_clock(self.clock.clone())
        .with_locks(self.locks.clone());
        EncounterScheduler::new(ctx)
    }

    pub fn game_master(&self) -> EncounterScheduler {
        self.scheduler(Role::GameMaster)
    }

    pub fn player(&self) -> EncounterScheduler {
        self.scheduler(Role::Player)
    }

    pub fn state(&self) -> EncounterState {
        self.store.load(&encounter_id()).unwrap().unwrap()
    }
}
