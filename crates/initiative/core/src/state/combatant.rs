use super::{ActorId, CombatantId};

/// Who controls a combatant.
///
/// Only used by the "auto-roll non-player combatants" round-start policy.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Controller {
    /// Owned by a player; rolls for themselves under the npc-only policy.
    Player,
    /// Owned by the game master.
    #[default]
    GameMaster,
}

/// A participant of the encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub actor: ActorId,

    #[cfg_attr(feature = "serde", serde(default))]
    pub controller: Controller,

    /// Current initiative score. `None` until rolled.
    ///
    /// May be fractional and may drop below zero through pass decay.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub defeated: bool,

    /// Set once the combatant's turn passed during the current pass.
    /// Not persisted; [`EncounterState::acted_this_pass`] re-derives it from
    /// the turn pointer.
    ///
    /// [`EncounterState::acted_this_pass`]: super::EncounterState::acted_this_pass
    #[cfg_attr(feature = "serde", serde(skip))]
    pub acted_this_pass: bool,
}

impl Combatant {
    pub fn new(id: CombatantId, actor: ActorId, controller: Controller) -> Self {
        Self {
            id,
            actor,
            controller,
            initiative: None,
            defeated: false,
            acted_this_pass: false,
        }
    }

    #[must_use]
    pub fn with_initiative(mut self, initiative: f64) -> Self {
        self.initiative = Some(initiative);
        self
    }

    #[must_use]
    pub fn with_defeated(mut self, defeated: bool) -> Self {
        self.defeated = defeated;
        self
    }

    /// Returns the score usable for ordering, rejecting anything that is not a
    /// finite number.
    pub fn score(&self) -> Option<f64> {
        self.initiative.filter(|score| score.is_finite())
    }

    /// Returns true while the combatant still has an action left this pass.
    pub fn has_action_left(&self) -> bool {
        self.score().is_some_and(|score| score > 0.0)
    }

    pub fn is_player(&self) -> bool {
        self.controller == Controller::Player
    }
}

/// Mutable collection of the encounter's combatants, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CombatantSet {
    combatants: Vec<Combatant>,
}

impl CombatantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|combatant| combatant.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|combatant| combatant.id == id)
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.get(id).is_some()
    }

    /// Adds a combatant. Returns it back if the id is already taken.
    pub fn insert(&mut self, combatant: Combatant) -> Result<(), Combatant> {
        if self.contains(combatant.id) {
            return Err(combatant);
        }
        self.combatants.push(combatant);
        Ok(())
    }

    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        let index = self.combatants.iter().position(|c| c.id == id)?;
        Some(self.combatants.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.combatants.iter().map(|combatant| combatant.id)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl FromIterator<Combatant> for CombatantSet {
    /// Collects combatants, keeping the first occurrence of a duplicated id.
    fn from_iter<T: IntoIterator<Item = Combatant>>(iter: T) -> Self {
        let mut set = Self::new();
        for combatant in iter {
            let _ = set.insert(combatant);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_scores_have_no_action_left() {
        let nan = Combatant::new(CombatantId(1), ActorId(1), Controller::GameMaster)
            .with_initiative(f64::NAN);
        assert_eq!(nan.score(), None);
        assert!(!nan.has_action_left());

        let spent = Combatant::new(CombatantId(2), ActorId(2), Controller::GameMaster)
            .with_initiative(0.0);
        assert!(!spent.has_action_left());

        let ready = Combatant::new(CombatantId(3), ActorId(3), Controller::Player)
            .with_initiative(0.5);
        assert!(ready.has_action_left());
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut set = CombatantSet::new();
        let first = Combatant::new(CombatantId(1), ActorId(1), Controller::Player);
        set.insert(first.clone()).unwrap();

        let rejected = set.insert(first).unwrap_err();
        assert_eq!(rejected.id, CombatantId(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn controller_parses_case_insensitively() {
        let parsed: Controller = "PLAYER".parse().unwrap();
        assert_eq!(parsed, Controller::Player);
        assert_eq!(Controller::GameMaster.to_string(), "game_master");
    }
}
