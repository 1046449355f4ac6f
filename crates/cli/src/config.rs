//! Driver configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

use runtime::RuntimeConfig;

/// Configuration of one scripted session.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub runtime: RuntimeConfig,
    /// Encounter document to load; the bundled demo when unset.
    pub encounter_file: Option<PathBuf>,
    /// Number of "next turn" calls to make.
    pub turns: usize,
    /// Fixed dice seed; a random one when unset.
    pub dice_seed: Option<u64>,
    pub enable_persistence: bool,
    pub store_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            encounter_file: None,
            turns: 12,
            dice_seed: None,
            enable_persistence: false,
            store_dir: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ENCOUNTER_FILE` - Encounter JSON to load (default: bundled demo)
    /// - `TURNS` - Number of next-turn calls (default: 12)
    /// - `DICE_SEED` - Seed for reproducible rolls (default: random)
    /// - `PASS_DECAY` - Score lost per completed pass (default: 10)
    /// - `SKIP_DEFEATED` - Skip defeated combatants (default: true)
    /// - `NPC_ONLY_AUTO_ROLL` - Only auto-roll non-player combatants (default: false)
    /// - `ENABLE_PERSISTENCE` - Store encounters as files (default: false)
    /// - `STORE_DIR` - Directory for stored encounters (default: platform-specific)
    /// - `RELAY_BUFFER` - Relay channel capacity (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let initiative = &mut config.runtime.initiative;

        if let Some(decay) = read_env::<u32>("PASS_DECAY") {
            initiative.pass_decay = decay;
        }
        if let Some(skip) = read_env_bool("SKIP_DEFEATED") {
            initiative.skip_defeated = skip;
        }
        if let Some(npc_only) = read_env_bool("NPC_ONLY_AUTO_ROLL") {
            initiative.npc_only_auto_roll = npc_only;
        }
        if let Some(capacity) = read_env::<usize>("RELAY_BUFFER") {
            config.runtime.relay_buffer_size = capacity.max(1);
        }

        config.encounter_file = env::var("ENCOUNTER_FILE").ok().map(PathBuf::from);
        if let Some(turns) = read_env::<usize>("TURNS") {
            config.turns = turns;
        }
        config.dice_seed = read_env::<u64>("DICE_SEED");
        config.enable_persistence = read_env_bool("ENABLE_PERSISTENCE").unwrap_or(false);
        config.store_dir = env::var("STORE_DIR").ok().map(PathBuf::from);

        config
    }

    /// Directory for stored encounters, following platform conventions.
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "initiative")
                .map(|dirs| dirs.data_dir().join("encounters"))
                .unwrap_or_else(|| PathBuf::from("./encounters"))
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Like [`read_env`], but a set variable without a value also means true.
fn read_env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim() {
        "" | "1" => Some(true),
        "0" => Some(false),
        other => other.parse().ok(),
    }
}
