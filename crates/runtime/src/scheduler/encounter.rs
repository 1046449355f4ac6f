use tracing::{debug, error, info, warn};

use initiative_core::{
    AddCombatant, AdjustInitiative, AdvanceGuard, AdvancePass, AdvanceRound, Combatant,
    CombatantId, EncounterId, EncounterState, RemoveCombatant, RollInitiative, RoundEngine,
    RoundStamp, SetDefeated, SetTurn, StartCombat, Transition, TransitionKind, TransitionOutcome,
    TurnPlan, plan_next_turn,
};

use crate::api::Result;
use crate::events::{EventBus, TurnEvent};
use crate::relay::{AuthorityGate, GateOutcome, RelayKind, RelayMessage, RelayPayload};

use super::locks::acquire;
use super::{SchedulerContext, TurnScheduler};

/// What a "next turn" style call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTurnOutcome {
    /// Combat was not running and has been started.
    Started { current: Option<CombatantId> },
    /// The pointer moved within the current pass.
    Stepped {
        turn: usize,
        current: Option<CombatantId>,
    },
    PassAdvanced(RoundStamp),
    RoundAdvanced(RoundStamp),
    /// The advance was requested from the privileged party; nothing changed
    /// locally.
    Relayed(RelayKind),
    /// The request no longer matched the stored counters and was ignored.
    Stale,
    /// A relay reached a party that cannot commit it.
    Ignored,
}

/// Scheduler for encounters stored in a shared document store.
pub struct EncounterScheduler {
    ctx: SchedulerContext,
    gate: AuthorityGate,
}

impl EncounterScheduler {
    pub fn new(ctx: SchedulerContext) -> Self {
        let gate = AuthorityGate::new(
            ctx.privilege.clone(),
            ctx.channel.clone(),
            ctx.events.clone(),
        );
        Self { ctx, gate }
    }

    pub fn context(&self) -> &SchedulerContext {
        &self.ctx
    }

    pub fn events(&self) -> &EventBus {
        &self.ctx.events
    }

    pub fn is_privileged(&self) -> bool {
        self.gate.is_privileged()
    }

    // ===== queries =====

    pub fn state(&self, encounter: &EncounterId) -> Result<EncounterState> {
        self.ctx.store.require(encounter)
    }

    /// Combatant whose turn it is, `None` before combat starts.
    pub fn current_combatant(&self, encounter: &EncounterId) -> Result<Option<Combatant>> {
        let state = self.state(encounter)?;
        Ok(state.current_combatant().cloned())
    }

    /// The frozen order of the current pass.
    pub fn turn_sequence(&self, encounter: &EncounterId) -> Result<Vec<Combatant>> {
        let state = self.state(encounter)?;
        Ok(state.turn_sequence().into_iter().cloned().collect())
    }

    /// Combatants that already took their turn in the current pass.
    pub fn acted_this_pass(&self, encounter: &EncounterId) -> Result<Vec<CombatantId>> {
        let state = self.state(encounter)?;
        Ok(state.acted_this_pass())
    }

    /// What the next "next turn" call would do, without doing it.
    pub fn plan(&self, encounter: &EncounterId) -> Result<TurnPlan> {
        let state = self.state(encounter)?;
        Ok(plan_next_turn(&state, &self.ctx.config))
    }

    // ===== commands =====

    pub fn start_combat(&self, encounter: &EncounterId) -> Result<Option<CombatantId>> {
        self.gate.require(TransitionKind::StartCombat)?;
        let (outcome, state) = self.commit(encounter, StartCombat)?;
        let current = state.current_combatant().map(|c| c.id);

        info!(%encounter, round = outcome.after.round, current = ?current, "combat started");
        self.ctx.events.publish(TurnEvent::CombatStarted {
            encounter: encounter.clone(),
            stamp: outcome.after.stamp(),
            current,
        });
        Ok(current)
    }

    /// Ends the current pass. Privileged.
    pub fn advance_pass(&self, encounter: &EncounterId) -> Result<NextTurnOutcome> {
        self.gate.require(TransitionKind::AdvancePass)?;
        self.commit_advance(encounter, RelayKind::AdvancePass, AdvanceGuard::Forced)
    }

    /// Starts the next round. Privileged.
    pub fn advance_round(&self, encounter: &EncounterId) -> Result<NextTurnOutcome> {
        self.gate.require(TransitionKind::AdvanceRound)?;
        self.commit_advance(encounter, RelayKind::AdvanceRound, AdvanceGuard::Forced)
    }

    /// Adds a signed delta to one combatant's score. Privileged.
    pub fn adjust_initiative(
        &self,
        encounter: &EncounterId,
        combatant: CombatantId,
        delta: f64,
    ) -> Result<Option<f64>> {
        self.gate.require(TransitionKind::AdjustInitiative)?;
        let (_, state) = self.commit(encounter, AdjustInitiative::new(combatant, delta))?;
        let score = state.combatants.get(combatant).and_then(Combatant::score);

        debug!(%encounter, %combatant, delta, score = ?score, "initiative adjusted");
        self.ctx.events.publish(TurnEvent::InitiativeAdjusted {
            encounter: encounter.clone(),
            combatant,
            score,
        });
        Ok(score)
    }

    pub fn add_combatant(&self, encounter: &EncounterId, combatant: Combatant) -> Result<()> {
        self.gate.require(TransitionKind::AddCombatant)?;
        let id = combatant.id;
        self.commit(encounter, AddCombatant::new(combatant))?;
        self.roster_changed(encounter, TransitionKind::AddCombatant, id);
        Ok(())
    }

    pub fn remove_combatant(&self, encounter: &EncounterId, combatant: CombatantId) -> Result<()> {
        self.gate.require(TransitionKind::RemoveCombatant)?;
        self.commit(encounter, RemoveCombatant::new(combatant))?;
        self.roster_changed(encounter, TransitionKind::RemoveCombatant, combatant);
        Ok(())
    }

    pub fn set_defeated(
        &self,
        encounter: &EncounterId,
        combatant: CombatantId,
        defeated: bool,
    ) -> Result<()> {
        self.gate.require(TransitionKind::SetDefeated)?;
        self.commit(encounter, SetDefeated::new(combatant, defeated))?;
        self.roster_changed(encounter, TransitionKind::SetDefeated, combatant);
        Ok(())
    }

    /// Commits a relayed advance request on the privileged side.
    ///
    /// Duplicates and reordered requests resolve to [`NextTurnOutcome::Stale`].
    pub fn handle_relay(&self, message: &RelayMessage) -> Result<NextTurnOutcome> {
        let kind = message.kind();
        let payload = message.payload();

        if !self.is_privileged() {
            debug!(encounter = %payload.encounter_id, %kind, "ignoring relay on unprivileged party");
            return Ok(NextTurnOutcome::Ignored);
        }

        info!(
            encounter = %payload.encounter_id,
            %kind,
            explicit = payload.explicit,
            "received relay request"
        );
        let guard = if payload.explicit && kind == RelayKind::AdvanceRound {
            AdvanceGuard::explicit(payload.expected)
        } else {
            AdvanceGuard::requested(payload.expected)
        };
        self.commit_advance(&payload.encounter_id, kind, guard)
    }

    /// Decodes and handles a raw envelope.
    pub fn handle_raw(&self, raw: &str) -> Result<NextTurnOutcome> {
        let message = RelayMessage::decode(raw)?;
        self.handle_relay(&message)
    }

    // ===== internals =====

    /// Loads, executes one transition, and saves under the encounter lock.
    /// Nothing is saved on error.
    fn commit(
        &self,
        encounter: &EncounterId,
        transition: impl Into<Transition>,
    ) -> Result<(TransitionOutcome, EncounterState)> {
        let transition = transition.into();
        let kind = transition.kind();

        let lock = self.ctx.locks.lock_for(encounter)?;
        let _held = acquire(&lock)?;

        let result = self.ctx.store.require(encounter).and_then(|mut state| {
            let env = self.ctx.env();
            let outcome = RoundEngine::new(&mut state).execute(&env, transition)?;
            self.ctx.store.save(&state)?;
            Ok((outcome, state))
        });

        if let Err(error) = &result
            && !error.is_stale()
        {
            error!(%encounter, %kind, %error, "transition aborted");
        }
        result
    }

    fn commit_advance(
        &self,
        encounter: &EncounterId,
        kind: RelayKind,
        guard: AdvanceGuard,
    ) -> Result<NextTurnOutcome> {
        let transition: Transition = match kind {
            RelayKind::AdvancePass => AdvancePass { guard }.into(),
            RelayKind::AdvanceRound => AdvanceRound { guard }.into(),
        };

        let (outcome, state) = match self.commit(encounter, transition) {
            Ok(committed) => committed,
            Err(error) if error.is_stale() => {
                debug!(%encounter, %kind, %error, "ignoring stale advance");
                return Ok(NextTurnOutcome::Stale);
            }
            Err(error) => return Err(error),
        };

        let stamp = outcome.after.stamp();
        let current = state.current_combatant().map(|c| c.id);
        let event = match kind {
            RelayKind::AdvancePass => {
                info!(%encounter, %stamp, current = ?current, "pass advanced");
                TurnEvent::PassAdvanced {
                    encounter: encounter.clone(),
                    stamp,
                    current,
                }
            }
            RelayKind::AdvanceRound => {
                info!(%encounter, %stamp, current = ?current, "round advanced");
                self.ctx.clock.on_round_advanced(encounter, stamp.round);
                TurnEvent::RoundAdvanced {
                    encounter: encounter.clone(),
                    stamp,
                    current,
                }
            }
        };
        self.ctx.events.publish(event);

        Ok(match kind {
            RelayKind::AdvancePass => NextTurnOutcome::PassAdvanced(stamp),
            RelayKind::AdvanceRound => NextTurnOutcome::RoundAdvanced(stamp),
        })
    }

    /// Commits locally when privileged, relays the request otherwise.
    fn route_advance(
        &self,
        encounter: &EncounterId,
        kind: RelayKind,
        guard: AdvanceGuard,
        payload: RelayPayload,
    ) -> Result<NextTurnOutcome> {
        let outcome = self
            .gate
            .route(kind, payload, || self.commit_advance(encounter, kind, guard))?;
        Ok(match outcome {
            GateOutcome::Applied(outcome) => outcome,
            GateOutcome::Relayed => NextTurnOutcome::Relayed(kind),
        })
    }

    fn roster_changed(&self, encounter: &EncounterId, kind: TransitionKind, combatant: CombatantId) {
        debug!(%encounter, %kind, %combatant, "roster changed");
        self.ctx.events.publish(TurnEvent::RosterChanged {
            encounter: encounter.clone(),
            kind,
            combatant,
        });
    }
}

impl TurnScheduler for EncounterScheduler {
    fn setup_turns(&self, encounter: &EncounterId) -> Result<()> {
        self.start_combat(encounter).map(|_| ())
    }

    fn next_turn(&self, encounter: &EncounterId) -> Result<NextTurnOutcome> {
        let state = self.state(encounter)?;
        let expected = state.stamp();

        match plan_next_turn(&state, &self.ctx.config) {
            TurnPlan::StartCombat => {
                warn!(%encounter, "next turn requested before combat started; starting combat");
                let current = self.start_combat(encounter)?;
                Ok(NextTurnOutcome::Started { current })
            }
            TurnPlan::Step { index } => {
                self.gate.require(TransitionKind::SetTurn)?;
                let step = SetTurn::planned(index, state.round);
                let (_, state) = match self.commit(encounter, step) {
                    Ok(committed) => committed,
                    Err(error) if error.is_stale() => {
                        debug!(%encounter, turn = index, %error, "ignoring stale step");
                        return Ok(NextTurnOutcome::Stale);
                    }
                    Err(error) => return Err(error),
                };
                let current = state.current_combatant().map(|c| c.id);

                debug!(%encounter, turn = index, current = ?current, "turn advanced");
                self.ctx.events.publish(TurnEvent::TurnAdvanced {
                    encounter: encounter.clone(),
                    turn: index,
                    current,
                });
                Ok(NextTurnOutcome::Stepped {
                    turn: index,
                    current,
                })
            }
            TurnPlan::AdvancePass => self.route_advance(
                encounter,
                RelayKind::AdvancePass,
                AdvanceGuard::requested(Some(expected)),
                RelayPayload::new(encounter.clone(), Some(expected)),
            ),
            TurnPlan::AdvanceRound => self.route_advance(
                encounter,
                RelayKind::AdvanceRound,
                AdvanceGuard::requested(Some(expected)),
                RelayPayload::new(encounter.clone(), Some(expected)),
            ),
        }
    }

    /// Ends the round regardless of the plan, as long as the counters have
    /// not moved since they were read.
    fn next_round(&self, encounter: &EncounterId) -> Result<NextTurnOutcome> {
        let expected = self.state(encounter)?.stamp();
        self.route_advance(
            encounter,
            RelayKind::AdvanceRound,
            AdvanceGuard::explicit(Some(expected)),
            RelayPayload::new(encounter.clone(), Some(expected)).into_explicit(),
        )
    }

    fn roll_initiative(&self, encounter: &EncounterId, combatants: &[CombatantId]) -> Result<()> {
        self.gate.require(TransitionKind::RollInitiative)?;
        let (_, state) = self.commit(encounter, RollInitiative::new(combatants.iter().copied()))?;

        debug!(%encounter, count = combatants.len(), turn = state.round.turn, "initiative rolled");
        self.ctx.events.publish(TurnEvent::InitiativeRolled {
            encounter: encounter.clone(),
            combatants: combatants.to_vec(),
        });
        Ok(())
    }
}
