//! State-based actions
//!
//! Rule-mandated corrections that are not player actions. Every violation
//! found in one scan is applied together, then the state is scanned again,
//! until a scan finds nothing.

use crate::core::{CardId, CounterType, LossReason, PlayerId};
use crate::game::{EngineConfig, GameState};
use crate::zones::Zone;
use crate::Result;

/// One correction found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateBasedAction {
    PlayerLoses { player: PlayerId, reason: LossReason },
    /// Lethal damage or toughness 0 or less
    CreatureDies { card_id: CardId },
    /// Remove this many +1/+1 and -1/-1 counters each
    CountersAnnihilate { card_id: CardId, pairs: u32 },
}

/// Violations were still pending after the checker's last allowed pass
#[derive(Debug, Clone)]
pub struct SbaDivergence {
    /// State after the last fully applied pass
    pub last_state: GameState,
    pub iterations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateBasedActionChecker {
    max_iterations: u32,
}

impl Default for StateBasedActionChecker {
    fn default() -> Self {
        Self::new(EngineConfig::default().max_sba_iterations)
    }
}

impl StateBasedActionChecker {
    pub fn new(max_iterations: u32) -> Self {
        StateBasedActionChecker { max_iterations }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_sba_iterations)
    }

    /// Apply state-based actions until none remain
    ///
    /// At most `max_iterations` passes are applied. A state with no
    /// violations comes back equal to the input.
    pub fn run(&self, state: &GameState) -> std::result::Result<GameState, SbaDivergence> {
        let mut current = state.clone();
        for _ in 0..self.max_iterations {
            let actions = Self::scan(&current);
            if actions.is_empty() {
                return Ok(current);
            }
            current = Self::apply(&current, &actions);
        }
        if Self::scan(&current).is_empty() {
            return Ok(current);
        }

        current.logger.internal_error(&format!(
            "State-based actions still pending after {} passes",
            self.max_iterations
        ));
        Err(SbaDivergence {
            last_state: current,
            iterations: self.max_iterations,
        })
    }

    /// Find every violation in `state`
    pub fn scan(state: &GameState) -> Vec<StateBasedAction> {
        let mut actions = Vec::new();

        for &player_id in state.player_ids() {
            let Ok(player) = state.get_player(player_id) else {
                continue;
            };
            if player.has_lost {
                continue;
            }
            if player.life <= 0 {
                actions.push(StateBasedAction::PlayerLoses {
                    player: player_id,
                    reason: LossReason::ZeroLife,
                });
            } else if player.drew_from_empty_library {
                actions.push(StateBasedAction::PlayerLoses {
                    player: player_id,
                    reason: LossReason::DrewFromEmptyLibrary,
                });
            }
        }

        let plus = CounterType::plus_one_plus_one();
        let minus = CounterType::minus_one_minus_one();
        for card_id in state.battlefield_cards() {
            let Ok(card) = state.cards.get(card_id) else {
                continue;
            };
            if let Some(toughness) = state.effective_toughness(card_id) {
                if card.damage >= toughness {
                    actions.push(StateBasedAction::CreatureDies { card_id });
                    continue;
                }
            }
            let pairs = card.get_counter(&plus).min(card.get_counter(&minus));
            if pairs > 0 {
                actions.push(StateBasedAction::CountersAnnihilate { card_id, pairs });
            }
        }

        actions
    }

    /// Apply one scan's worth of actions as a batch
    fn apply(state: &GameState, actions: &[StateBasedAction]) -> GameState {
        let mut next = state.clone();
        for action in actions {
            if let Err(err) = Self::apply_one(&mut next, action) {
                state
                    .logger
                    .internal_error(&format!("Could not apply {action:?}: {err}"));
            }
        }
        next
    }

    fn apply_one(state: &mut GameState, action: &StateBasedAction) -> Result<()> {
        match action {
            StateBasedAction::PlayerLoses { player, reason } => {
                let player = state.players.get_mut(*player)?;
                player.lose_game(*reason);
                let name = player.name.clone();
                state.logger.normal(&format!("{name} loses the game ({reason:?})"));
            }
            StateBasedAction::CreatureDies { card_id } => {
                log_if_verbose!(
                    state.logger,
                    "{} is put into the graveyard",
                    state.cards.get(*card_id)?.name
                );
                state.move_card_to(*card_id, Zone::Graveyard)?;
            }
            StateBasedAction::CountersAnnihilate { card_id, pairs } => {
                let card = state.cards.get_mut(*card_id)?;
                card.remove_counter(&CounterType::plus_one_plus_one(), *pairs);
                card.remove_counter(&CounterType::minus_one_minus_one(), *pairs);
            }
        }
        Ok(())
    }
}
