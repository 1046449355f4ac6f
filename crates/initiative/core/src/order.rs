//! Turn ordering within one pass.
//!
//! Combatants are ordered by:
//! 1. initiative score, higher first; missing or non-finite scores last
//! 2. edge, higher first
//! 3. reaction, higher first
//! 4. intuition, higher first
//! 5. one fresh coin flip per comparison
//!
//! The coin flip makes the comparator non-transitive for fully tied
//! combatants, so two sorts of the same snapshot may order them differently.
//! The engine therefore sorts once per pass and persists the result.

use core::cmp::Ordering;

use crate::env::{DiceOracle, EncounterEnv};
use crate::state::{Combatant, CombatantId, CombatantSet};

/// Attribute keys consulted after the score ties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TieBreakKeys {
    pub edge: i32,
    pub reaction: i32,
    pub intuition: i32,
}

impl TieBreakKeys {
    pub const fn new(edge: i32, reaction: i32, intuition: i32) -> Self {
        Self {
            edge,
            reaction,
            intuition,
        }
    }
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compares two combatants; `Less` means `a` acts before `b`.
///
/// Draws from `dice` only when score and all three attributes tie.
pub fn compare_combatants(
    a: &Combatant,
    a_keys: TieBreakKeys,
    b: &Combatant,
    b_keys: TieBreakKeys,
    dice: &dyn DiceOracle,
) -> Ordering {
    compare_scores(a.score(), b.score())
        .then_with(|| b_keys.edge.cmp(&a_keys.edge))
        .then_with(|| b_keys.reaction.cmp(&a_keys.reaction))
        .then_with(|| b_keys.intuition.cmp(&a_keys.intuition))
        .then_with(|| {
            if dice.coin() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
}

fn keys_of(combatant: &Combatant, env: &EncounterEnv<'_>) -> TieBreakKeys {
    let attributes = env.attributes_of(combatant.actor);
    TieBreakKeys::new(attributes.edge, attributes.reaction, attributes.intuition)
}

/// Sorts the whole roster into a turn order.
///
/// Uses a plain insertion sort: the comparator may be non-transitive, which
/// the standard library sorts are allowed to reject with a panic.
pub fn sort_turn_order(combatants: &CombatantSet, env: &EncounterEnv<'_>) -> Vec<CombatantId> {
    let keyed: Vec<(&Combatant, TieBreakKeys)> = combatants
        .iter()
        .map(|combatant| (combatant, keys_of(combatant, env)))
        .collect();

    let mut sorted: Vec<(&Combatant, TieBreakKeys)> = Vec::with_capacity(keyed.len());
    for (combatant, keys) in keyed {
        let mut slot = sorted.len();
        while slot > 0 {
            let (prev, prev_keys) = sorted[slot - 1];
            if compare_combatants(combatant, keys, prev, prev_keys, env.dice()) == Ordering::Less {
                slot -= 1;
            } else {
                break;
            }
        }
        sorted.insert(slot, (combatant, keys));
    }

    sorted.into_iter().map(|(combatant, _)| combatant.id).collect()
}

/// Inserts `id` into an already ordered `sequence`, ahead of the first entry
/// it sorts before. Unknown ids are appended.
pub fn insert_in_order(
    sequence: &mut Vec<CombatantId>,
    id: CombatantId,
    combatants: &CombatantSet,
    env: &EncounterEnv<'_>,
) {
    let Some(newcomer) = combatants.get(id) else {
        sequence.push(id);
        return;
    };
    let newcomer_keys = keys_of(newcomer, env);

    let slot = sequence.iter().position(|&existing| {
        combatants.get(existing).is_some_and(|other| {
            let other_keys = keys_of(other, env);
            compare_combatants(newcomer, newcomer_keys, other, other_keys, env.dice())
                == Ordering::Less
        })
    });

    match slot {
        Some(slot) => sequence.insert(slot, id),
        None => sequence.push(id),
    }
}
