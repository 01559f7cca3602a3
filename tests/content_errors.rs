//! Bad card data degrades locally instead of failing the game

mod common;

use common::{builder, cards_in, players};
use mtg_rules_core::core::{AbilityRegistry, DefinitionId};
use mtg_rules_core::game::{
    DeckList, Engine, EngineConfig, GameBuilder, GameLogger, PlayerAction,
};
use mtg_rules_core::loader::CardDatabase;
use mtg_rules_core::zones::Zone;
use mtg_rules_core::MtgError;
use similar_asserts::assert_eq;
use std::sync::Arc;

#[test]
fn test_unknown_ability_key_is_skipped() {
    let state = builder(EngineConfig::default())
        .add_player("Alice", DeckList::new())
        .with_card_in_zone("mystery_beast", Zone::Battlefield)
        .add_player("Bob", DeckList::new())
        .build()
        .unwrap();
    let (alice, _) = players(&state);

    let beast = cards_in(&state, alice, Zone::Battlefield)[0];
    let card = state.cards.get(beast).unwrap();
    // Only the keyword survived
    assert_eq!(card.abilities.static_abilities.len(), 1);
    assert!(card.abilities.triggered.is_empty());
    assert!(card.abilities.activated.is_empty());
    assert!(state.invariant_violations().is_empty());

    let errors = state.logger.logs_in_category("content_error");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("does_not_exist"));
}

#[test]
fn test_missing_definition_in_deck() {
    let state = builder(EngineConfig::default())
        .add_player(
            "Alice",
            DeckList::new().with("forest", 10).with("black_lotus", 1),
        )
        .add_player("Bob", DeckList::new().with("forest", 10))
        .build()
        .unwrap();

    assert_eq!(state.cards.len(), 20);
    assert_eq!(state.logger.logs_in_category("content_error").len(), 1);

    // The game itself carries on
    let (alice, _) = players(&state);
    let mut engine = Engine::new(state);
    engine.submit_action(alice, PlayerAction::AdvanceTurn).unwrap();
}

#[test]
fn test_instantiating_unknown_definition() {
    let mut state = builder(EngineConfig::default())
        .add_player("Alice", DeckList::new())
        .add_player("Bob", DeckList::new())
        .build()
        .unwrap();
    let alice = state.player_ids()[0];
    let hand = state.player_zone(alice, Zone::Hand).unwrap();

    let before = state.clone();
    let err = state
        .instantiate_card(&DefinitionId::from("nope"), alice, hand)
        .unwrap_err();
    assert!(matches!(err, MtgError::MissingCardDefinition(_)));
    assert_eq!(state, before);
}

#[test]
fn test_malformed_card_json() {
    let err = CardDatabase::from_json(r#"[{"id": "x"}]"#).unwrap_err();
    assert!(matches!(err, MtgError::SerializationError(_)));
}

#[test]
fn test_bad_parameters_are_content_errors() {
    let db = CardDatabase::from_json(
        r#"[{"id": "bad_elf", "name": "Bad Elf", "types": ["Creature"],
             "power": 1, "toughness": 1,
             "abilities": [{"key": "tap_for_mana", "params": {"color": "purple"}}]}]"#,
    )
    .unwrap();
    let state = GameBuilder::new(
        Arc::new(db),
        Arc::new(AbilityRegistry::with_builtin_abilities()),
    )
    .with_logger(Arc::new(GameLogger::capturing()))
    .add_player("Alice", DeckList::new().with("bad_elf", 2))
    .add_player("Bob", DeckList::new())
    .build()
    .unwrap();

    assert_eq!(state.cards.len(), 2);
    assert_eq!(state.abilities.len(), 0);
    assert_eq!(state.logger.logs_in_category("content_error").len(), 2);
}
