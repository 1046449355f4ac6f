//! Initiative driver binary.
//!
//! Loads an encounter document, then plays a scripted session where a game
//! master and a player alternate "next turn" calls. Player advance requests
//! travel through the relay and are committed by the game master's worker.
//!
//! # Examples
//!
//! ```bash
//! DICE_SEED=7 TURNS=20 cargo run -p initiative-cli
//! ENCOUNTER_FILE=demos/bridge.json ENABLE_PERSISTENCE=1 cargo run -p initiative-cli
//! ```
mod config;
mod roster;
mod session;

use anyhow::Result;

use config::CliConfig;
use roster::Roster;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    let roster = Roster::load(config.encounter_file.as_deref())?;
    tracing::info!(
        encounter = %roster.state.id,
        combatants = roster.state.combatants.len(),
        "encounter loaded"
    );

    session::run(config, roster).await?;

    tracing::info!("session complete");
    Ok(())
}
