//! Shared fixtures for unit tests

use crate::core::{AbilityRegistry, CardDefinition, CardId, DefinitionId, PlayerId};
use crate::game::{DeckList, GameBuilder, GameLogger, GameState};
use crate::loader::CardDatabase;
use crate::zones::Zone;
use serde_json::json;
use std::sync::Arc;

pub struct TestGame {
    pub state: GameState,
    pub alice: PlayerId,
    pub bob: PlayerId,
}

pub fn test_card_db() -> CardDatabase {
    CardDatabase::new()
        .with_card(CardDefinition::land("forest", "Forest"))
        .with_card(CardDefinition::creature("grizzly_bears", "Grizzly Bears", 2, 2))
        .with_card(
            CardDefinition::creature("llanowar_elves", "Llanowar Elves", 1, 1)
                .with_ability("tap_for_mana", json!({"color": "G"})),
        )
        .with_card(
            CardDefinition::creature("doomed_martyr", "Doomed Martyr", 1, 1)
                .with_ability("gain_life_on_death", json!({"amount": 2})),
        )
        .with_card(
            CardDefinition::creature("blood_artist", "Blood Artist", 0, 1)
                .with_ability("drain_on_creature_death", json!({"amount": 1})),
        )
        .with_card(
            CardDefinition::creature("flame_elemental", "Flame Elemental", 2, 2)
                .with_ability("damage_on_enter", json!({"amount": 1})),
        )
        .with_card(
            CardDefinition::creature("soul_warden", "Soul Warden", 1, 1)
                .with_ability("upkeep_life_gain", json!({"amount": 1})),
        )
        .with_card(
            CardDefinition::creature("prodigal_pyromancer", "Prodigal Pyromancer", 1, 1)
                .with_ability("ping", json!({"amount": 1})),
        )
        .with_card(
            CardDefinition::creature("pump_ogre", "Pump Ogre", 2, 2)
                .with_ability("pump_counters", json!({"mana": "R"})),
        )
        .with_card(
            CardDefinition::creature("broken_abilities", "Broken Abilities", 1, 1)
                .with_ability("keyword", json!({"keyword": "Flying"}))
                .with_ability("no_such_ability", json!({})),
        )
}

/// Players with empty libraries, turn 1 untap step, capturing logger
pub fn game_with_players(count: usize) -> GameState {
    let names = ["Alice", "Bob", "Carol", "Dave", "Eve", "Frank"];
    let mut builder = GameBuilder::new(
        Arc::new(test_card_db()),
        Arc::new(AbilityRegistry::with_builtin_abilities()),
    )
    .with_logger(Arc::new(GameLogger::capturing()));
    for name in names.iter().cycle().take(count) {
        builder = builder.add_player(name, DeckList::new());
    }
    builder.build().expect("test game")
}

pub fn two_player_game() -> TestGame {
    let state = game_with_players(2);
    let alice = state.player_ids()[0];
    let bob = state.player_ids()[1];
    TestGame { state, alice, bob }
}

pub trait TestStateExt {
    /// A copy of this state with one more card in `zone` of `owner`
    fn with_card(&self, definition: &str, owner: PlayerId, zone: Zone) -> (GameState, CardId);
}

impl TestStateExt for GameState {
    fn with_card(&self, definition: &str, owner: PlayerId, zone: Zone) -> (GameState, CardId) {
        let mut next = self.clone();
        let zone_id = next.player_zone(owner, zone).expect("player zone");
        let card_id = next
            .instantiate_card(&DefinitionId::from(definition), owner, zone_id)
            .expect("known test card");
        (next, card_id)
    }
}
