//! Turn phases and steps, and the turn state machine

use crate::core::PlayerId;
use crate::game::{EngineConfig, GameState};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Major phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PreCombatMain,
    Combat,
    PostCombatMain,
    Ending,
}

impl Phase {
    pub fn is_main(&self) -> bool {
        matches!(self, Phase::PreCombatMain | Phase::PostCombatMain)
    }
}

/// Specific steps within phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    // Beginning Phase
    Untap,
    Upkeep,
    Draw,

    // Pre-Combat Main Phase
    Main1,

    // Combat Phase
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,

    // Post-Combat Main Phase
    Main2,

    // Ending Phase
    End,
    Cleanup,
}

impl Step {
    /// Get the phase this step belongs to
    pub fn phase(&self) -> Phase {
        match self {
            Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::Main1 => Phase::PreCombatMain,
            Step::BeginCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::CombatDamage
            | Step::EndCombat => Phase::Combat,
            Step::Main2 => Phase::PostCombatMain,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// Get the next step in turn order
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Untap => Some(Step::Upkeep),
            Step::Upkeep => Some(Step::Draw),
            Step::Draw => Some(Step::Main1),
            Step::Main1 => Some(Step::BeginCombat),
            Step::BeginCombat => Some(Step::DeclareAttackers),
            Step::DeclareAttackers => Some(Step::DeclareBlockers),
            Step::DeclareBlockers => Some(Step::CombatDamage),
            Step::CombatDamage => Some(Step::EndCombat),
            Step::EndCombat => Some(Step::Main2),
            Step::Main2 => Some(Step::End),
            Step::End => Some(Step::Cleanup),
            Step::Cleanup => None, // End of turn
        }
    }

    /// Can a player play lands in this step?
    pub fn can_play_lands(&self) -> bool {
        self.phase().is_main()
    }
}

/// Where the game is within the turn cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Current turn number (starts at 1)
    pub turn_number: u32,

    pub current_step: Step,

    /// Active player (whose turn it is)
    pub active_player: PlayerId,

    /// Player who may take the next action
    pub priority_player: PlayerId,
}

impl TurnStructure {
    /// Turn 1, Untap, with the starting player active and holding priority
    pub fn new(starting_player: PlayerId) -> Self {
        TurnStructure {
            turn_number: 1,
            current_step: Step::Untap,
            active_player: starting_player,
            priority_player: starting_player,
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.current_step.phase()
    }
}

/// Steps the game forward
///
/// The only code path allowed to change the turn number, step or active
/// player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnManager {
    skip_first_draw: bool,
}

impl Default for TurnManager {
    fn default() -> Self {
        TurnManager {
            skip_first_draw: true,
        }
    }
}

impl TurnManager {
    pub fn from_config(config: &EngineConfig) -> Self {
        TurnManager {
            skip_first_draw: config.skip_first_draw,
        }
    }

    /// Return `state` moved exactly one step forward, with the entry
    /// effects of the new step applied
    ///
    /// Priority is not touched; callers reset it to the active player.
    pub fn advance(&self, state: &GameState) -> GameState {
        let mut next = state.clone();
        match self.advance_in_place(&mut next) {
            Ok(()) => next,
            Err(err) => {
                state
                    .logger
                    .internal_error(&format!("Could not advance the turn: {err}"));
                state.clone()
            }
        }
    }

    fn advance_in_place(&self, state: &mut GameState) -> Result<()> {
        // Mana empties between steps
        for player_id in state.player_ids().to_vec() {
            state.players.get_mut(player_id)?.mana_pool.clear();
        }

        match state.turn.current_step.next() {
            Some(step) => state.turn.current_step = step,
            None => {
                let next_player = state.next_player_after(state.turn.active_player)?;
                state.turn.turn_number += 1;
                state.turn.active_player = next_player;
                state.turn.current_step = Step::Untap;
            }
        }

        self.enter_step(state)
    }

    fn enter_step(&self, state: &mut GameState) -> Result<()> {
        let active = state.turn.active_player;
        match state.turn.current_step {
            Step::Untap => {
                let name = state.get_player(active)?.name.clone();
                log_if_verbose!(state.logger, "Turn {} ({})", state.turn.turn_number, name);

                state.players.get_mut(active)?.reset_lands_played();
                let battlefield = state.get_player(active)?.zones.battlefield;
                for card_id in state.zone(battlefield)?.cards.clone() {
                    let card = state.cards.get_mut(card_id)?;
                    if card.controller == active {
                        card.untap();
                        card.summoning_sick = false;
                    }
                }
            }
            Step::Draw => {
                if !(self.skip_first_draw && state.turn.turn_number == 1) {
                    state.draw_card(active)?;
                }
            }
            Step::Cleanup => {
                for card_id in state.battlefield_cards() {
                    state.cards.get_mut(card_id)?.damage = 0;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
