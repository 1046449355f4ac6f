/// Initiative configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InitiativeConfig {
    /// Round number assigned when combat starts and used as the reset target.
    pub initial_round: u32,

    /// Pass number assigned at combat start and at every round start.
    pub initial_pass: u32,

    /// Score subtracted from every combatant when a pass completes.
    pub pass_decay: u32,

    /// Skip defeated combatants when looking for the next turn.
    pub skip_defeated: bool,

    /// Only auto-roll non-player combatants when a new round starts.
    /// Player combatants are reset to "not rolled" and roll for themselves.
    pub npc_only_auto_roll: bool,
}

impl InitiativeConfig {
    // ===== compile-time limits =====
    /// Maximum number of combatants tracked by one encounter.
    pub const MAX_COMBATANTS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INITIAL_ROUND: u32 = 1;
    pub const DEFAULT_INITIAL_PASS: u32 = 1;
    pub const DEFAULT_PASS_DECAY: u32 = 10;

    pub fn new() -> Self {
        Self {
            initial_round: Self::DEFAULT_INITIAL_ROUND,
            initial_pass: Self::DEFAULT_INITIAL_PASS,
            pass_decay: Self::DEFAULT_PASS_DECAY,
            skip_defeated: true,
            npc_only_auto_roll: false,
        }
    }

    #[must_use]
    pub fn with_pass_decay(mut self, pass_decay: u32) -> Self {
        self.pass_decay = pass_decay;
        self
    }

    #[must_use]
    pub fn with_skip_defeated(mut self, skip_defeated: bool) -> Self {
        self.skip_defeated = skip_defeated;
        self
    }

    #[must_use]
    pub fn with_npc_only_auto_roll(mut self, npc_only_auto_roll: bool) -> Self {
        self.npc_only_auto_roll = npc_only_auto_roll;
        self
    }

    /// Overrides the starting counters. A zero pass is bumped to one so an
    /// active encounter never reports pass 0.
    #[must_use]
    pub fn with_initial_counters(mut self, round: u32, pass: u32) -> Self {
        self.initial_round = round.max(1);
        self.initial_pass = pass.max(1);
        self
    }
}

impl Default for InitiativeConfig {
    fn default() -> Self {
        Self::new()
    }
}
