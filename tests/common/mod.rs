//! Shared setup for integration tests

#![allow(dead_code)]

use mtg_rules_core::core::{AbilityRegistry, CardId, PlayerId, TargetRef};
use mtg_rules_core::game::actions::{can_activate_ability, can_play_land};
use mtg_rules_core::game::{
    DeckList, Engine, EngineConfig, GameBuilder, GameLogger, GameState, PlayerAction, Step,
};
use mtg_rules_core::loader::CardDatabase;
use mtg_rules_core::zones::Zone;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::sync::Arc;

pub const CARDS_JSON: &str = r#"[
    {"id": "forest", "name": "Forest", "types": ["Land"]},
    {"id": "mountain", "name": "Mountain", "types": ["Land"]},
    {"id": "grizzly_bears", "name": "Grizzly Bears", "types": ["Creature"],
     "power": 2, "toughness": 2},
    {"id": "hill_giant", "name": "Hill Giant", "types": ["Creature"],
     "power": 3, "toughness": 3},
    {"id": "prodigal_pyromancer", "name": "Prodigal Pyromancer", "types": ["Creature"],
     "power": 1, "toughness": 1,
     "abilities": [{"key": "ping", "params": {"amount": 1}}]},
    {"id": "llanowar_elves", "name": "Llanowar Elves", "types": ["Creature"],
     "power": 1, "toughness": 1,
     "abilities": [{"key": "tap_for_mana", "params": {"color": "G"}}]},
    {"id": "doomed_martyr", "name": "Doomed Martyr", "types": ["Creature"],
     "power": 1, "toughness": 1,
     "abilities": [{"key": "gain_life_on_death", "params": {"amount": 2}}]},
    {"id": "blood_artist", "name": "Blood Artist", "types": ["Creature"],
     "power": 0, "toughness": 1,
     "abilities": [{"key": "drain_on_creature_death", "params": {"amount": 1}}]},
    {"id": "soul_warden", "name": "Soul Warden", "types": ["Creature"],
     "power": 1, "toughness": 1,
     "abilities": [{"key": "upkeep_life_gain", "params": {"amount": 1}}]},
    {"id": "mystery_beast", "name": "Mystery Beast", "types": ["Creature"],
     "power": 2, "toughness": 2,
     "abilities": [{"key": "does_not_exist", "params": {}},
                   {"key": "keyword", "params": {"keyword": "Trample"}}]}
]"#;

pub fn card_db() -> Arc<CardDatabase> {
    Arc::new(CardDatabase::from_json(CARDS_JSON).expect("test card JSON"))
}

pub fn builder(config: EngineConfig) -> GameBuilder {
    GameBuilder::new(card_db(), Arc::new(AbilityRegistry::with_builtin_abilities()))
        .with_config(config)
        .with_logger(Arc::new(GameLogger::capturing()))
}

pub fn basic_deck() -> DeckList {
    DeckList::new()
        .with("forest", 12)
        .with("mountain", 4)
        .with("grizzly_bears", 6)
        .with("llanowar_elves", 4)
        .with("prodigal_pyromancer", 4)
}

/// Two players with 30-card decks, seeded
pub fn two_player_game(seed: u64) -> GameState {
    builder(EngineConfig::default().with_seed(seed))
        .add_player("Alice", basic_deck())
        .add_player("Bob", basic_deck())
        .build()
        .expect("two player game")
}

/// Two players with empty libraries, starting at `step` of turn 1
pub fn empty_game(step: Step) -> GameState {
    builder(EngineConfig::default())
        .add_player("Alice", DeckList::new())
        .add_player("Bob", DeckList::new())
        .starting_step(step)
        .build()
        .expect("empty game")
}

pub fn players(state: &GameState) -> (PlayerId, PlayerId) {
    (state.player_ids()[0], state.player_ids()[1])
}

pub fn cards_in(state: &GameState, player: PlayerId, zone: Zone) -> Vec<CardId> {
    let zone_id = state.player_zone(player, zone).expect("player zone");
    state.zone(zone_id).expect("zone").cards.iter().copied().collect()
}

/// Every action the priority holder could legally submit right now
pub fn legal_actions(state: &GameState) -> Vec<PlayerAction> {
    let player = state.priority_player();
    let mut actions = vec![PlayerAction::PassPriority, PlayerAction::AdvanceTurn];

    for card_id in cards_in(state, player, Zone::Hand) {
        if can_play_land(state, player, card_id) {
            actions.push(PlayerAction::PlayLand { card_id });
        }
    }

    let mut targets = vec![TargetRef::None];
    targets.extend(state.opponents(player).map(TargetRef::Player));
    for card_id in state.battlefield_cards() {
        let Ok(card) = state.cards.get(card_id) else {
            continue;
        };
        for &ability_id in &card.abilities.activated {
            for &target in &targets {
                if can_activate_ability(state, player, card_id, ability_id, target) {
                    actions.push(PlayerAction::ActivateAbility {
                        card_id,
                        ability_id,
                        target,
                    });
                }
            }
        }
    }
    actions
}

/// Submit up to `max_actions` randomly chosen legal actions, checking the
/// state invariants after each one
pub fn random_play(engine: &mut Engine, seed: u64, max_actions: usize) {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    for _ in 0..max_actions {
        if engine.state().is_game_over() {
            break;
        }
        let actions = legal_actions(engine.state());
        let action = actions[rng.gen_range(0..actions.len())].clone();
        let player = engine.state().priority_player();

        if let Err(err) = engine.submit_action(player, action.clone()) {
            panic!("legal action {action:?} failed: {err}");
        }
        let violations = engine.state().invariant_violations();
        assert!(violations.is_empty(), "after {action:?}: {violations:?}");
        let state = engine.state();
        if !state.is_game_over() {
            let holder = state.get_player(state.priority_player()).expect("holder");
            assert!(!holder.has_lost, "after {action:?}: priority rests on a lost player");
        }
    }
}
