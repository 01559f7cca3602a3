//! Card effects
//!
//! Effects are plain data; `apply_effect` turns one into a new snapshot.
//! An effect whose target has gone away does nothing.

use crate::core::{CardId, Color, CounterType, DefinitionId, PlayerId};
use crate::game::GameState;
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Target reference for effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    /// Target a player
    Player(PlayerId),
    /// Target a creature or other permanent
    Permanent(CardId),
    /// No target (e.g., "each player", "all creatures")
    #[default]
    None,
}

/// Basic card effects that can be executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// "Lightning Bolt deals 3 damage to any target"
    DealDamage { target: TargetRef, amount: i32 },

    /// "You gain 3 life"
    GainLife { player: PlayerId, amount: i32 },

    /// "Each opponent loses 1 life"
    LoseLife { player: PlayerId, amount: i32 },

    /// "Draw a card"
    DrawCards { player: PlayerId, count: u8 },

    /// "Destroy target creature"
    DestroyPermanent { target: CardId },

    /// "Tap target creature"
    TapPermanent { target: CardId },

    /// "Untap target land"
    UntapPermanent { target: CardId },

    /// "Add {G}"
    AddMana {
        player: PlayerId,
        color: Color,
        amount: u8,
    },

    /// "Put two +1/+1 counters on target creature"
    PutCounters {
        target: CardId,
        counter_type: CounterType,
        amount: u32,
    },

    /// "Target player mills 3 cards"
    Mill { player: PlayerId, count: u8 },

    /// "Create a 1/1 Soldier token"
    CreateToken {
        controller: PlayerId,
        definition: DefinitionId,
    },

    /// Several effects in order
    Sequence(Vec<Effect>),
}

/// Apply an effect to a snapshot, producing the next snapshot
///
/// The input is never modified. If the effect cannot be carried out at all
/// the result equals the input.
pub fn apply_effect(state: &GameState, effect: &Effect) -> GameState {
    let mut next = state.clone();
    match apply_effect_in_place(&mut next, effect) {
        Ok(()) => next,
        Err(err) => {
            state
                .logger
                .verbose(&format!("Effect {effect:?} had no effect: {err}"));
            state.clone()
        }
    }
}

/// Apply an effect to a working copy that is not yet visible to anyone
pub(crate) fn apply_effect_in_place(state: &mut GameState, effect: &Effect) -> Result<()> {
    match effect {
        Effect::DealDamage { target, amount } => match target {
            TargetRef::Player(player) => state.players.get_mut(*player)?.lose_life(*amount),
            TargetRef::Permanent(card_id) => {
                if state.zone_type_of(*card_id) == Some(Zone::Battlefield) {
                    state.cards.get_mut(*card_id)?.damage += amount;
                }
            }
            TargetRef::None => {}
        },
        Effect::GainLife { player, amount } => state.players.get_mut(*player)?.gain_life(*amount),
        Effect::LoseLife { player, amount } => state.players.get_mut(*player)?.lose_life(*amount),
        Effect::DrawCards { player, count } => {
            for _ in 0..*count {
                state.draw_card(*player)?;
            }
        }
        Effect::DestroyPermanent { target } => {
            if state.zone_type_of(*target) == Some(Zone::Battlefield) {
                state.move_card_to(*target, Zone::Graveyard)?;
            }
        }
        Effect::TapPermanent { target } => state.cards.get_mut(*target)?.tap(),
        Effect::UntapPermanent { target } => state.cards.get_mut(*target)?.untap(),
        Effect::AddMana {
            player,
            color,
            amount,
        } => state.players.get_mut(*player)?.mana_pool.add(*color, *amount),
        Effect::PutCounters {
            target,
            counter_type,
            amount,
        } => state
            .cards
            .get_mut(*target)?
            .add_counter(counter_type.clone(), *amount),
        Effect::Mill { player, count } => {
            let library = state.get_player(*player)?.zones.library;
            for _ in 0..*count {
                match state.zone(library)?.peek_top() {
                    Some(card_id) => state.move_card_to(card_id, Zone::Graveyard)?,
                    None => break,
                }
            }
        }
        Effect::CreateToken {
            controller,
            definition,
        } => {
            let battlefield = state.get_player(*controller)?.zones.battlefield;
            let token = state.instantiate_card(definition, *controller, battlefield)?;
            state.cards.get_mut(token)?.summoning_sick = true;
        }
        Effect::Sequence(effects) => {
            for inner in effects {
                apply_effect_in_place(state, inner)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{two_player_game, TestGame, TestStateExt};

    #[test]
    fn test_damage_to_player_and_creature() {
        let TestGame { state, alice, bob } = two_player_game();
        let (state, bears) = state.with_card("grizzly_bears", bob, Zone::Battlefield);

        let after = apply_effect(
            &state,
            &Effect::Sequence(vec![
                Effect::DealDamage {
                    target: TargetRef::Player(alice),
                    amount: 3,
                },
                Effect::DealDamage {
                    target: TargetRef::Permanent(bears),
                    amount: 1,
                },
            ]),
        );

        assert_eq!(after.get_player(alice).unwrap().life, 17);
        assert_eq!(after.cards.get(bears).unwrap().damage, 1);
        // Input snapshot untouched
        assert_eq!(state.get_player(alice).unwrap().life, 20);
        assert_eq!(state.cards.get(bears).unwrap().damage, 0);
    }

    #[test]
    fn test_destroy_moves_to_owner_graveyard() {
        let TestGame { state, bob, .. } = two_player_game();
        let (state, bears) = state.with_card("grizzly_bears", bob, Zone::Battlefield);

        let after = apply_effect(&state, &Effect::DestroyPermanent { target: bears });

        let graveyard = after.get_player(bob).unwrap().zones.graveyard;
        assert!(after.zone(graveyard).unwrap().contains(bears));
        assert_eq!(after.cards.get(bears).unwrap().current_zone, graveyard);
        assert!(after.invariant_violations().is_empty());
    }

    #[test]
    fn test_missing_target_leaves_state_unchanged() {
        let TestGame { state, .. } = two_player_game();
        let after = apply_effect(
            &state,
            &Effect::TapPermanent {
                target: CardId::new(9999),
            },
        );
        assert_eq!(after, state);
    }

    #[test]
    fn test_create_token_and_mill() {
        let TestGame { state, alice, .. } = two_player_game();
        let (state, _) = state.with_card("forest", alice, Zone::Library);
        let (state, _) = state.with_card("forest", alice, Zone::Library);

        let after = apply_effect(
            &state,
            &Effect::Sequence(vec![
                Effect::CreateToken {
                    controller: alice,
                    definition: DefinitionId::from("grizzly_bears"),
                },
                Effect::Mill {
                    player: alice,
                    count: 5,
                },
            ]),
        );

        let zones = after.get_player(alice).unwrap().zones;
        assert_eq!(after.zone(zones.battlefield).unwrap().len(), 1);
        assert_eq!(after.zone(zones.graveyard).unwrap().len(), 2);
        assert!(after.zone(zones.library).unwrap().is_empty());
        assert!(after.invariant_violations().is_empty());
    }
}
