//! Event payloads published by the scheduler.

use serde::{Deserialize, Serialize};

use initiative_core::{CombatantId, EncounterId, RoundStamp, TransitionKind};

use crate::relay::RelayKind;

/// Encounter changes observers re-render from.
///
/// Only committed transitions and relay traffic are reported; rejected
/// operations surface as errors to the caller instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    CombatStarted {
        encounter: EncounterId,
        stamp: RoundStamp,
        current: Option<CombatantId>,
    },
    TurnAdvanced {
        encounter: EncounterId,
        turn: usize,
        current: Option<CombatantId>,
    },
    PassAdvanced {
        encounter: EncounterId,
        stamp: RoundStamp,
        current: Option<CombatantId>,
    },
    RoundAdvanced {
        encounter: EncounterId,
        stamp: RoundStamp,
        current: Option<CombatantId>,
    },
    InitiativeRolled {
        encounter: EncounterId,
        combatants: Vec<CombatantId>,
    },
    InitiativeAdjusted {
        encounter: EncounterId,
        combatant: CombatantId,
        score: Option<f64>,
    },
    /// A combatant was added, removed, or had its defeated flag changed.
    RosterChanged {
        encounter: EncounterId,
        kind: TransitionKind,
        combatant: CombatantId,
    },
    RelayRequested {
        encounter: EncounterId,
        kind: RelayKind,
    },
    /// The relay channel refused the request; the caller retries on its next
    /// "next turn" call.
    RelayDropped {
        encounter: EncounterId,
        kind: RelayKind,
        reason: String,
    },
}

impl TurnEvent {
    pub fn encounter(&self) -> &EncounterId {
        match self {
            Self::CombatStarted { encounter, .. }
            | Self::TurnAdvanced { encounter, .. }
            | Self::PassAdvanced { encounter, .. }
            | Self::RoundAdvanced { encounter, .. }
            | Self::InitiativeRolled { encounter, .. }
            | Self::InitiativeAdjusted { encounter, .. }
            | Self::RosterChanged { encounter, .. }
            | Self::RelayRequested { encounter, .. }
            | Self::RelayDropped { encounter, .. } => encounter,
        }
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, Self::RelayRequested { .. } | Self::RelayDropped { .. })
    }
}
