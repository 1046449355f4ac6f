//! Relay envelope exchanged between parties.
//!
//! Wire shape (JSON):
//!
//! ```json
//! {"type": "AdvancePass", "payload": {"encounterId": "bridge", "expected": {"round": 1, "pass": 2}}}
//! ```
//!
//! `expected` is optional. `"explicit": true` marks a round request made
//! regardless of remaining actions; it is omitted otherwise. Envelopes are ephemeral and may arrive duplicated
//! or out of order; the receiving side re-validates against the stored
//! document before committing anything.

use serde::{Deserialize, Serialize};

use initiative_core::{EncounterId, RoundStamp, TransitionKind};

use crate::api::{Result, RuntimeError};

/// Transitions that can be requested through the relay.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
pub enum RelayKind {
    AdvancePass,
    AdvanceRound,
}

impl RelayKind {
    pub const fn transition_kind(&self) -> TransitionKind {
        match self {
            Self::AdvancePass => TransitionKind::AdvancePass,
            Self::AdvanceRound => TransitionKind::AdvanceRound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub encounter_id: EncounterId,

    /// Counters the requester observed when it decided to advance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<RoundStamp>,

    /// Asked for explicitly rather than planned by a "next turn" call.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub explicit: bool,
}

impl RelayPayload {
    pub fn new(encounter_id: EncounterId, expected: Option<RoundStamp>) -> Self {
        Self {
            encounter_id,
            expected,
            explicit: false,
        }
    }

    #[must_use]
    pub fn into_explicit(mut self) -> Self {
        self.explicit = true;
        self
    }
}

/// Request for the privileged party to commit a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RelayMessage {
    AdvanceRound(RelayPayload),
    AdvancePass(RelayPayload),
}

impl RelayMessage {
    pub fn new(kind: RelayKind, payload: RelayPayload) -> Self {
        match kind {
            RelayKind::AdvancePass => Self::AdvancePass(payload),
            RelayKind::AdvanceRound => Self::AdvanceRound(payload),
        }
    }

    pub fn kind(&self) -> RelayKind {
        match self {
            Self::AdvancePass(_) => RelayKind::AdvancePass,
            Self::AdvanceRound(_) => RelayKind::AdvanceRound,
        }
    }

    pub fn payload(&self) -> &RelayPayload {
        match self {
            Self::AdvancePass(payload) | Self::AdvanceRound(payload) => payload,
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RuntimeError::MalformedMessage(e.to_string()))
    }

    /// Decodes an envelope, rejecting unknown types and blank encounter ids.
    pub fn decode(raw: &str) -> Result<Self> {
        let message: Self =
            serde_json::from_str(raw).map_err(|e| RuntimeError::MalformedMessage(e.to_string()))?;
        if message.payload().encounter_id.is_empty() {
            return Err(RuntimeError::MalformedMessage(
                "payload.encounterId is empty".to_string(),
            ));
        }
        Ok(message)
    }
}
