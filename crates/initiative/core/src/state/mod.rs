//! Authoritative encounter document.
//!
//! This module owns the data persisted in the shared store: the round
//! counters, the combatant roster, and the turn order frozen for the current
//! pass. Runtime layers load and save it, but mutate it exclusively through
//! [`crate::engine::RoundEngine`].
mod combatant;
mod ids;
mod round;

pub use combatant::{Combatant, CombatantSet, Controller};
pub use ids::{ActorId, CombatantId, EncounterId};
pub use round::{RoundStamp, RoundState};

/// Canonical snapshot of one encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    pub id: EncounterId,

    /// Round/pass/turn counters.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub round: RoundState,

    pub combatants: CombatantSet,

    /// Turn order computed when the current pass began.
    ///
    /// Always a permutation of the combatant ids. Persisted so every party
    /// reads the same sequence instead of redrawing the random tie-break.
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn_order: Vec<CombatantId>,
}

impl EncounterState {
    /// Creates an empty, not started encounter.
    pub fn new(id: impl Into<EncounterId>) -> Self {
        Self {
            id: id.into(),
            round: RoundState::NOT_STARTED,
            combatants: CombatantSet::new(),
            turn_order: Vec::new(),
        }
    }

    /// Creates a not started encounter with the given roster, in roster order.
    pub fn with_combatants(
        id: impl Into<EncounterId>,
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Self {
        let combatants: CombatantSet = combatants.into_iter().collect();
        let turn_order = combatants.ids().collect();
        Self {
            id: id.into(),
            round: RoundState::NOT_STARTED,
            combatants,
            turn_order,
        }
    }

    pub fn stamp(&self) -> RoundStamp {
        self.round.stamp()
    }

    /// Resolves the frozen order into combatants.
    pub fn turn_sequence(&self) -> Vec<&Combatant> {
        self.turn_order
            .iter()
            .filter_map(|&id| self.combatants.get(id))
            .collect()
    }

    /// Returns the combatant whose turn it is, if combat is running.
    pub fn current_combatant(&self) -> Option<&Combatant> {
        if !self.round.is_started() {
            return None;
        }
        let id = self.turn_order.get(self.round.turn)?;
        self.combatants.get(*id)
    }

    /// Combatants whose turn has already passed in the current pass, in
    /// turn order.
    ///
    /// Every slot before the pointer counts, so the answer is the same for a
    /// document reloaded from storage, where the per-combatant flag is empty.
    pub fn acted_this_pass(&self) -> Vec<CombatantId> {
        if !self.round.is_started() {
            return Vec::new();
        }
        self.turn_order
            .iter()
            .enumerate()
            .filter(|&(index, &id)| {
                index < self.round.turn
                    || self.combatants.get(id).is_some_and(|c| c.acted_this_pass)
            })
            .map(|(_, &id)| id)
            .collect()
    }

    /// Position of a combatant in the frozen order.
    pub fn position_of(&self, id: CombatantId) -> Option<usize> {
        self.turn_order.iter().position(|&entry| entry == id)
    }

    /// Returns true when `turn_order` lists every combatant exactly once.
    pub fn order_is_consistent(&self) -> bool {
        if self.turn_order.len() != self.combatants.len() {
            return false;
        }
        let mut seen: Vec<CombatantId> = self.turn_order.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len() == self.turn_order.len() && seen.iter().all(|&id| self.combatants.contains(id))
    }
}
