//! Triggered ability dispatch

use crate::core::{AbilityKind, TriggeredAbility};
use crate::game::{GameEvent, GameState};
use std::sync::Arc;

/// Offers each event to every triggered ability in the game
///
/// Cards are visited in ascending id order and each card's triggered
/// abilities in declaration order. The state is threaded through the sweep:
/// an ability sees the results of every ability that resolved before it.
/// Abilities trigger from any zone; whether a card must be on the
/// battlefield is for the ability to decide.
pub struct TriggeredAbilityManager;

impl TriggeredAbilityManager {
    pub fn handle_event(event: &GameEvent, state: &GameState) -> GameState {
        let mut current = state.clone();

        for card_id in state.cards.sorted_ids() {
            let triggered = match current.cards.get(card_id) {
                Ok(card) => card.abilities.triggered.clone(),
                Err(_) => continue,
            };

            for ability_id in triggered {
                let Some(ability) = Self::triggered_ability(&current, ability_id) else {
                    continue;
                };
                if ability.check_trigger(event, &current) {
                    log_if_verbose!(
                        current.logger,
                        "{} triggers on {}: {}",
                        current.cards.get(card_id).map_or("?", |c| c.name.as_str()),
                        event,
                        ability.description()
                    );
                    current = ability.resolve(&current);
                }
            }
        }

        current
    }

    fn triggered_ability(
        state: &GameState,
        ability_id: crate::core::AbilityId,
    ) -> Option<Arc<dyn TriggeredAbility>> {
        match &state.abilities.get(ability_id).ok()?.kind {
            AbilityKind::Triggered(ability) => Some(Arc::clone(ability)),
            _ => None,
        }
    }
}
