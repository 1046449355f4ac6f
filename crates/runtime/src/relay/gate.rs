//! Per-transition authority decisions.

use std::sync::Arc;

use initiative_core::TransitionKind;
use tracing::{debug, warn};

use crate::api::{Result, RuntimeError};
use crate::events::{EventBus, TurnEvent};

use super::{RelayChannel, RelayKind, RelayMessage, RelayPayload};

/// Answers "may this party commit privileged transitions".
///
/// Consulted at the start of every mutating call, never cached.
pub trait Privilege: Send + Sync {
    fn is_privileged(&self) -> bool;
}

/// Fixed role of a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    GameMaster,
    Player,
}

impl Privilege for Role {
    fn is_privileged(&self) -> bool {
        matches!(self, Role::GameMaster)
    }
}

/// Result of routing a transition through the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome<T> {
    /// Committed locally.
    Applied(T),
    /// Handed to the privileged party; nothing changed locally.
    Relayed,
}

/// Decides per transition whether to commit locally or relay a request.
#[derive(Clone)]
pub struct AuthorityGate {
    privilege: Arc<dyn Privilege>,
    channel: Arc<dyn RelayChannel>,
    events: EventBus,
}

impl AuthorityGate {
    pub fn new(
        privilege: Arc<dyn Privilege>,
        channel: Arc<dyn RelayChannel>,
        events: EventBus,
    ) -> Self {
        Self {
            privilege,
            channel,
            events,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.privilege.is_privileged()
    }

    /// Fails with `NotPrivileged` when `kind` needs authority this party lacks.
    pub fn require(&self, kind: TransitionKind) -> Result<()> {
        if kind.requires_authority() && !self.is_privileged() {
            return Err(RuntimeError::NotPrivileged { kind });
        }
        Ok(())
    }

    /// Commits through `commit` when privileged, otherwise relays a request.
    ///
    /// A relay that cannot be delivered is logged and reported as relayed:
    /// the caller retries through its next "next turn" call.
    pub fn route<T>(
        &self,
        kind: RelayKind,
        payload: RelayPayload,
        commit: impl FnOnce() -> Result<T>,
    ) -> Result<GateOutcome<T>> {
        if self.is_privileged() {
            return commit().map(GateOutcome::Applied);
        }

        let encounter = payload.encounter_id.clone();
        let message = RelayMessage::new(kind, payload);
        match self.channel.send(&message) {
            Ok(()) => {
                debug!(%encounter, %kind, "relayed request to privileged party");
                self.events.publish(TurnEvent::RelayRequested {
                    encounter,
                    kind,
                });
            }
            Err(error) => {
                warn!(%encounter, %kind, %error, "dropping relay request");
                self.events.publish(TurnEvent::RelayDropped {
                    encounter,
                    kind,
                    reason: error.to_string(),
                });
            }
        }
        Ok(GateOutcome::Relayed)
    }
}
