//! Scripted table: a game master and one player take turns calling
//! "next turn" on the same encounter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{info, warn};

use initiative_core::{EncounterId, PcgDice};
use runtime::{
    EncounterRepository, EncounterScheduler, Event, FileEncounterRepository,
    InMemoryEncounterRepo, NextTurnOutcome, Role, Runtime, Topic, TurnEvent, TurnScheduler,
};

use crate::config::CliConfig;
use crate::roster::Roster;

const RELAY_WAIT: Duration = Duration::from_secs(2);

pub async fn run(config: CliConfig, roster: Roster) -> Result<()> {
    let seed = config.dice_seed.unwrap_or_else(rand::random);
    info!(seed, "dice seeded");

    let store: Arc<dyn EncounterRepository> = if config.enable_persistence {
        let dir = config.store_dir();
        info!(dir = %dir.display(), "storing encounters on disk");
        Arc::new(FileEncounterRepository::new(&dir)?)
    } else {
        Arc::new(InMemoryEncounterRepo::new())
    };

    let encounter = roster.state.id.clone();
    if store.load(&encounter)?.is_none() {
        store.save(&roster.state)?;
    }

    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .store(store)
        .attributes(Arc::new(roster.attributes.clone()))
        .dice(Arc::new(PcgDice::new(seed)))
        .build()
        .await?;

    let mut turn_events = runtime.subscribe(Topic::Turn);
    let game_master = runtime.scheduler();
    let player = runtime.party(Arc::new(Role::Player));

    for step in 0..config.turns {
        let (seat, scheduler) = if step % 2 == 0 {
            ("game master", game_master.as_ref())
        } else {
            ("player", &player)
        };

        let outcome = scheduler
            .next_turn(&encounter)
            .with_context(|| format!("next turn by {seat}"))?;
        info!(step, seat, ?outcome, "next turn");

        if let NextTurnOutcome::Relayed(kind) = outcome {
            match wait_for_commit(&mut turn_events).await {
                Some(event) => info!(%kind, ?event, "relayed request committed"),
                None => warn!(%kind, "relayed request not committed in time"),
            }
        }

        report(scheduler, &encounter, &roster)?;
    }

    runtime.shutdown().await?;
    Ok(())
}

/// Waits for the next pass or round advance, skipping other events.
async fn wait_for_commit(events: &mut broadcast::Receiver<Event>) -> Option<TurnEvent> {
    loop {
        let Ok(Ok(Event::Turn(event))) = timeout(RELAY_WAIT, events.recv()).await else {
            return None;
        };
        if matches!(
            event,
            TurnEvent::PassAdvanced { .. } | TurnEvent::RoundAdvanced { .. }
        ) {
            return Some(event);
        }
    }
}

fn report(scheduler: &EncounterScheduler, encounter: &EncounterId, roster: &Roster) -> Result<()> {
    let state = scheduler.state(encounter)?;
    let current = state
        .current_combatant()
        .map(|c| roster.name_of(c.id))
        .unwrap_or("-");
    let order: Vec<String> = state
        .turn_sequence()
        .into_iter()
        .map(|c| match c.score() {
            Some(score) => format!("{}={score}", roster.name_of(c.id)),
            None => format!("{}=?", roster.name_of(c.id)),
        })
        .collect();
    let acted: Vec<&str> = state
        .acted_this_pass()
        .into_iter()
        .map(|id| roster.name_of(id))
        .collect();

    info!(
        round = state.round.round,
        pass = state.round.pass,
        turn = state.round.turn,
        current,
        order = %order.join(", "),
        acted = %acted.join(", "),
        "encounter"
    );
    Ok(())
}
