//! Action pipeline
//!
//! The engine owns the authoritative snapshot of one game. Every accepted
//! action runs to completion before `submit_action` returns:
//!
//! 1. the primary effect (land play, priority pass, step advance, ability)
//! 2. an event pass over what the primary effect changed
//! 3. the state-based action fixpoint
//! 4. another event pass over what SBA and the first pass's triggers changed
//!
//! Steps 3 and 4 repeat while the event passes keep changing the game, up to
//! `max_reaction_rounds` extra times.

use crate::core::PlayerId;
use crate::error::RejectReason;
use crate::game::actions::{
    check_activate_ability, check_play_land, execute_activate_ability, execute_play_land,
};
use crate::game::{
    diff_events, EngineConfig, EventBus, EventFilter, GameEvent, GameLogger, GameState,
    PlayerAction, PriorityManager, SbaDivergence, StateBasedActionChecker, SubscriptionId,
    TriggeredAbilityManager, TurnManager,
};
use crate::{MtgError, Result};
use std::sync::Arc;

/// Single-writer orchestrator for one game
///
/// Nothing here locks. A host running many games gives each its own engine;
/// engines share no data and can live on separate threads.
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    bus: EventBus,
    turns: TurnManager,
    sba: StateBasedActionChecker,
    max_reaction_rounds: u32,
}

impl Engine {
    /// Create an engine with default limits
    pub fn new(state: GameState) -> Self {
        Self::with_config(state, &EngineConfig::default())
    }

    pub fn with_config(state: GameState, config: &EngineConfig) -> Self {
        Engine {
            state,
            bus: EventBus::new(),
            turns: TurnManager::from_config(config),
            sba: StateBasedActionChecker::from_config(config),
            max_reaction_rounds: config.max_reaction_rounds,
        }
    }

    /// The current authoritative snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn logger(&self) -> &Arc<GameLogger> {
        &self.state.logger
    }

    /// Register an observer; `"*"` subscribes to every event
    ///
    /// A handler returning `Some(state)` replaces the authoritative state.
    pub fn subscribe<F>(&mut self, filter: impl Into<EventFilter>, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent, &GameState) -> Option<GameState> + Send + 'static,
    {
        self.bus.subscribe(filter, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Process one action from `player`
    ///
    /// A rejected action leaves the state exactly as it was. If the
    /// state-based action check does not settle, the last fully applied pass
    /// is announced and kept, and the divergence is returned as an error.
    pub fn submit_action(&mut self, player: PlayerId, action: PlayerAction) -> Result<&GameState> {
        if let Err(reason) = self.check_can_act(player) {
            return Err(self.reject(player, &action, reason));
        }

        let before = self.state.clone();
        let primary = match self.apply_primary(&before, player, &action) {
            Ok(next) => next,
            Err(reason) => return Err(self.reject(player, &action, reason)),
        };

        // First pass: announce the primary effect
        let mut announced = primary.clone();
        let mut current = self.announce(&before, primary);

        let mut settled = false;
        for _ in 0..=self.max_reaction_rounds {
            let corrected = match self.sba.run(&current) {
                Ok(corrected) => corrected,
                Err(divergence) => return Err(self.contain_divergence(&announced, divergence)),
            };

            let previous = std::mem::replace(&mut announced, corrected.clone());
            current = self.announce(&previous, corrected);
            if current == announced {
                settled = true;
                break;
            }
        }

        if !settled {
            self.logger().internal_error(&format!(
                "Reactions still pending after {} rounds; committing without announcing",
                self.max_reaction_rounds
            ));
            current = match self.sba.run(&current) {
                Ok(corrected) => corrected,
                Err(divergence) => return Err(self.contain_divergence(&announced, divergence)),
            };
        }

        self.commit(current);
        Ok(&self.state)
    }

    fn check_can_act(&self, player: PlayerId) -> std::result::Result<(), RejectReason> {
        if self.state.is_game_over() {
            return Err(RejectReason::GameOver);
        }
        if !self.state.players.contains(player) {
            return Err(RejectReason::UnknownPlayer);
        }
        if self.state.get_player(player).is_ok_and(|p| p.has_lost) {
            return Err(RejectReason::PlayerHasLost);
        }
        if self.state.priority_player() != player {
            return Err(RejectReason::NotPriorityHolder);
        }
        Ok(())
    }

    fn apply_primary(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &PlayerAction,
    ) -> std::result::Result<GameState, RejectReason> {
        let next = match *action {
            PlayerAction::PlayLand { card_id } => {
                check_play_land(state, player, card_id)?;
                PriorityManager::set_active_player_priority(&execute_play_land(
                    state, player, card_id,
                ))
            }
            PlayerAction::PassPriority => PriorityManager::pass_priority(state),
            PlayerAction::AdvanceTurn => {
                PriorityManager::set_active_player_priority(&self.turns.advance(state))
            }
            PlayerAction::ActivateAbility {
                card_id,
                ability_id,
                target,
            } => {
                check_activate_ability(state, player, card_id, ability_id, target)?;
                PriorityManager::set_active_player_priority(&execute_activate_ability(
                    state, player, card_id, ability_id, target,
                ))
            }
        };
        Ok(next)
    }

    /// Diff `old` against `new` and run every resulting event through the
    /// triggered abilities and then the bus
    fn announce(&mut self, old: &GameState, new: GameState) -> GameState {
        let events = diff_events(old, &new);
        let mut current = new;
        for event in &events {
            log_if_verbose!(current.logger, "Event: {}", event);
            current = TriggeredAbilityManager::handle_event(event, &current);
            current = self.bus.emit(event, current);
        }
        current
    }

    /// Announce the passes the checker did apply, keep them, and turn the
    /// divergence into the caller's error
    fn contain_divergence(&mut self, announced: &GameState, divergence: SbaDivergence) -> MtgError {
        let state = self.announce(announced, divergence.last_state);
        self.commit(state);
        MtgError::StateBasedActionsDiverged {
            iterations: divergence.iterations,
        }
    }

    fn commit(&mut self, state: GameState) {
        // A player who lost during this action cannot keep priority
        self.state = PriorityManager::skip_lost_holder(&state);
        self.state.debug_log_state_hash("after action");
    }

    fn reject(&self, player: PlayerId, action: &PlayerAction, reason: RejectReason) -> MtgError {
        log_if_verbose!(
            self.state.logger,
            "Rejected {:?} from player {}: {}",
            action,
            player,
            reason
        );
        MtgError::ActionRejected(reason)
    }
}
