mod support;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

use initiative_core::{CombatantId, RoundStamp, ScriptedDice};
use runtime::{
    Event, InMemoryEncounterRepo, NextTurnOutcome, RelayKind, Role, Runtime, RuntimeError, Topic,
    TurnEvent, TurnScheduler,
};

use support::*;

async fn next_event(events: &mut broadcast::Receiver<Event>) -> Event {
    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event bus closed")
}

async fn game_master(store: Arc<InMemoryEncounterRepo>) -> Runtime {
    Runtime::builder()
        .store(store)
        .attributes(attributes())
        .dice(Arc::new(ScriptedDice::default()))
        .build()
        .await
        .expect("runtime should build")
}

fn pass_due() -> Arc<InMemoryEncounterRepo> {
    Arc::new(InMemoryEncounterRepo::with_encounters([running(
        [npc(1).with_initiative(21.0), npc(2).with_initiative(8.0)],
        1,
    )]))
}

#[tokio::test]
async fn worker_commits_relayed_pass_request() {
    let runtime = game_master(pass_due()).await;
    let mut turn_events = runtime.subscribe(Topic::Turn);
    let mut relay_events = runtime.subscribe(Topic::Relay);
    let player = runtime.party(Arc::new(Role::Player));

    let outcome = player.next_turn(&encounter_id()).unwrap();
    assert_eq!(outcome, NextTurnOutcome::Relayed(RelayKind::AdvancePass));

    assert_eq!(
        next_event(&mut relay_events).await,
        Event::Turn(TurnEvent::RelayRequested {
            encounter: encounter_id(),
            kind: RelayKind::AdvancePass,
        })
    );
    assert_eq!(
        next_event(&mut turn_events).await,
        Event::Turn(TurnEvent::PassAdvanced {
            encounter: encounter_id(),
            stamp: RoundStamp { round: 1, pass: 2 },
            current: Some(CombatantId(1)),
        })
    );
    assert_eq!(
        player.state(&encounter_id()).unwrap().stamp(),
        RoundStamp { round: 1, pass: 2 }
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_envelope_does_not_stop_the_worker() {
    let runtime = game_master(pass_due()).await;
    let mut turn_events = runtime.subscribe(Topic::Turn);

    runtime.relay().send_raw("not an envelope").unwrap();
    runtime
        .relay()
        .send_raw(r#"{"type":"AdvancePass","payload":{"encounterId":""}}"#)
        .unwrap();
    runtime
        .relay()
        .send_raw(r#"{"type":"AdvancePass","payload":{"encounterId":"bridge"}}"#)
        .unwrap();

    match next_event(&mut turn_events).await {
        Event::Turn(TurnEvent::PassAdvanced { stamp, .. }) => {
            assert_eq!(stamp, RoundStamp { round: 1, pass: 2 });
        }
        other => panic!("unexpected event: {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unreachable_relay_drops_the_request_without_failing() {
    let runtime = Runtime::builder()
        .store(pass_due())
        .attributes(attributes())
        .dice(Arc::new(ScriptedDice::default()))
        .privilege(Arc::new(Role::Player))
        .build()
        .await
        .unwrap();
    let mut relay_events = runtime.subscribe(Topic::Relay);

    let outcome = runtime.scheduler().next_turn(&encounter_id()).unwrap();
    assert_eq!(outcome, NextTurnOutcome::Relayed(RelayKind::AdvancePass));

    match next_event(&mut relay_events).await {
        Event::Turn(TurnEvent::RelayDropped { kind, .. }) => {
            assert_eq!(kind, RelayKind::AdvancePass);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        runtime.scheduler().state(&encounter_id()).unwrap().stamp(),
        RoundStamp { round: 1, pass: 1 }
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn build_requires_oracles() {
    let missing_dice = Runtime::builder().attributes(attributes()).build().await;
    assert!(matches!(
        missing_dice,
        Err(RuntimeError::MissingCollaborator(_))
    ));

    let missing_attributes = Runtime::builder()
        .dice(Arc::new(ScriptedDice::default()))
        .build()
        .await;
    assert!(matches!(
        missing_attributes,
        Err(RuntimeError::MissingCollaborator(_))
    ));
}
