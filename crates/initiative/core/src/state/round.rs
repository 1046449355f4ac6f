/// Round/pass/turn counters persisted with every encounter.
///
/// # Invariants
///
/// - `round == 0 && pass == 0` is the single "not started" state
/// - once `round > 0`, `pass >= 1`
/// - `turn` indexes the frozen turn order of the current pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    pub round: u32,
    pub pass: u32,
    pub turn: usize,
}

impl RoundState {
    pub const NOT_STARTED: Self = Self {
        round: 0,
        pass: 0,
        turn: 0,
    };

    pub const fn new(round: u32, pass: u32, turn: usize) -> Self {
        Self { round, pass, turn }
    }

    pub const fn is_started(&self) -> bool {
        self.round > 0
    }

    /// Returns true when the counters satisfy the round/pass invariant.
    pub const fn is_consistent(&self) -> bool {
        if self.round == 0 {
            self.pass == 0 && self.turn == 0
        } else {
            self.pass >= 1
        }
    }

    pub const fn stamp(&self) -> RoundStamp {
        RoundStamp {
            round: self.round,
            pass: self.pass,
        }
    }
}

/// Precondition stamp carried by relay requests.
///
/// A request built while the encounter was at `(round, pass)` is stale once
/// either counter moved on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundStamp {
    pub round: u32,
    pub pass: u32,
}

impl core::fmt::Display for RoundStamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "round {} pass {}", self.round, self.pass)
    }
}
