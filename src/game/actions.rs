//! Player actions and their predicate/executor pairs
//!
//! Every action kind has a pure predicate and an executor. The executor
//! re-checks the predicate and returns an unchanged copy of its input when
//! it fails, so calling it on an illegal action can never corrupt a game.

use crate::core::{AbilityId, CardId, Cost, PlayerId, TargetRef};
use crate::error::RejectReason;
use crate::game::GameState;
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Actions a player can submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    /// Play a land from hand
    PlayLand { card_id: CardId },

    PassPriority,

    /// Move the game one step forward
    AdvanceTurn,

    /// Activate an ability of a permanent; resolves immediately
    ActivateAbility {
        card_id: CardId,
        ability_id: AbilityId,
        #[serde(default)]
        target: TargetRef,
    },
}

fn check_priority(state: &GameState, player: PlayerId) -> std::result::Result<(), RejectReason> {
    if !state.players.contains(player) {
        return Err(RejectReason::UnknownPlayer);
    }
    if state.turn.priority_player != player {
        return Err(RejectReason::NotPriorityHolder);
    }
    Ok(())
}

/// Sorcery-speed actions wait for an empty stack. Nothing is ever put on
/// the stack yet, so this always holds.
fn stack_allows_sorcery_speed(_state: &GameState) -> bool {
    true
}

/// Why `player` may not play `card_id` as a land, if anything
pub fn check_play_land(
    state: &GameState,
    player: PlayerId,
    card_id: CardId,
) -> std::result::Result<(), RejectReason> {
    check_priority(state, player)?;
    if state.turn.active_player != player {
        return Err(RejectReason::NotActivePlayer);
    }
    if !state.turn.current_step.can_play_lands() {
        return Err(RejectReason::NotMainPhase);
    }
    if !stack_allows_sorcery_speed(state) {
        return Err(RejectReason::StackNotEmpty);
    }
    let card = state
        .cards
        .get(card_id)
        .map_err(|_| RejectReason::CardNotFound)?;
    let hand = state
        .get_player(player)
        .map_err(|_| RejectReason::UnknownPlayer)?
        .zones
        .hand;
    if card.current_zone != hand {
        return Err(RejectReason::CardNotInHand);
    }
    if !state.is_land(card_id) {
        return Err(RejectReason::NotALand);
    }
    let can_play = state
        .get_player(player)
        .is_ok_and(|p| p.can_play_land());
    if !can_play {
        return Err(RejectReason::LandLimitReached);
    }
    Ok(())
}

pub fn can_play_land(state: &GameState, player: PlayerId, card_id: CardId) -> bool {
    check_play_land(state, player, card_id).is_ok()
}

/// Put a land from hand onto the battlefield and count the land play
pub fn execute_play_land(state: &GameState, player: PlayerId, card_id: CardId) -> GameState {
    if !can_play_land(state, player, card_id) {
        return state.clone();
    }

    let mut next = state.clone();
    match play_land_in_place(&mut next, player, card_id) {
        Ok(()) => {
            log_if_verbose!(
                state.logger,
                "{} plays {}",
                next.get_player(player).map_or("?", |p| p.name.as_str()),
                next.cards.get(card_id).map_or("?", |c| c.name.as_str())
            );
            next
        }
        Err(err) => {
            state
                .logger
                .internal_error(&format!("Land play passed its check but failed: {err}"));
            state.clone()
        }
    }
}

fn play_land_in_place(state: &mut GameState, player: PlayerId, card_id: CardId) -> Result<()> {
    state.move_card_to(card_id, Zone::Battlefield)?;
    state.players.get_mut(player)?.play_land();
    Ok(())
}

/// Why `player` may not activate `ability_id` of `card_id`, if anything
pub fn check_activate_ability(
    state: &GameState,
    player: PlayerId,
    card_id: CardId,
    ability_id: AbilityId,
    target: TargetRef,
) -> std::result::Result<(), RejectReason> {
    check_priority(state, player)?;
    if state.is_game_over() {
        return Err(RejectReason::GameOver);
    }
    let card = state
        .cards
        .get(card_id)
        .map_err(|_| RejectReason::CardNotFound)?;
    if state.zone_type_of(card_id) != Some(Zone::Battlefield) {
        return Err(RejectReason::CardNotOnBattlefield);
    }
    if card.controller != player {
        return Err(RejectReason::NotController);
    }
    if !card.abilities.all().any(|id| id == ability_id) {
        return Err(RejectReason::AbilityNotFound);
    }
    let ability = state
        .abilities
        .get(ability_id)
        .map_err(|_| RejectReason::AbilityNotFound)?
        .as_activated()
        .ok_or(RejectReason::NotActivatedAbility)?;

    // {T} abilities of creatures wait out summoning sickness
    if Cost::includes_tap(ability.costs()) && card.summoning_sick && state.is_creature(card_id) {
        return Err(RejectReason::AbilityCannotActivate);
    }
    if !ability.can_activate(state, player, target) {
        return Err(RejectReason::AbilityCannotActivate);
    }
    if !ability
        .costs()
        .iter()
        .all(|cost| cost.can_pay(state, player, card_id))
    {
        return Err(RejectReason::CostUnpayable);
    }
    Ok(())
}

pub fn can_activate_ability(
    state: &GameState,
    player: PlayerId,
    card_id: CardId,
    ability_id: AbilityId,
    target: TargetRef,
) -> bool {
    check_activate_ability(state, player, card_id, ability_id, target).is_ok()
}

/// Pay the ability's costs and apply its effect
pub fn execute_activate_ability(
    state: &GameState,
    player: PlayerId,
    card_id: CardId,
    ability_id: AbilityId,
    target: TargetRef,
) -> GameState {
    if !can_activate_ability(state, player, card_id, ability_id, target) {
        return state.clone();
    }
    let Some(ability) = state
        .abilities
        .get(ability_id)
        .ok()
        .and_then(|a| a.as_activated())
    else {
        return state.clone();
    };

    log_if_verbose!(
        state.logger,
        "{} activates {}: {}",
        state.get_player(player).map_or("?", |p| p.name.as_str()),
        state.cards.get(card_id).map_or("?", |c| c.name.as_str()),
        ability.description()
    );
    ability.activate(state, player, card_id, target)
}
