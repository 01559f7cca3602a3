//! Independent games on separate threads

mod common;

use common::{random_play, two_player_game};
use mtg_rules_core::game::{compute_state_hash, Engine};
use similar_asserts::assert_eq;
use std::thread;

fn play(seed: u64) -> u64 {
    let mut engine = Engine::new(two_player_game(seed));
    random_play(&mut engine, seed, 300);
    compute_state_hash(engine.state())
}

#[test]
fn test_engines_on_separate_threads() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| thread::spawn(move || (seed, play(seed))))
        .collect();

    for handle in handles {
        let (seed, hash) = handle.join().expect("game thread panicked");
        // No shared state: same result as running it here
        assert_eq!(hash, play(seed));
    }
}

#[test]
fn test_engine_moves_between_threads() {
    let mut engine = Engine::new(two_player_game(9));
    random_play(&mut engine, 9, 50);
    let midway = engine.state().clone();

    let engine = thread::spawn(move || {
        random_play(&mut engine, 10, 50);
        engine
    })
    .join()
    .expect("game thread panicked");

    assert!(engine.state().invariant_violations().is_empty());
    assert!(midway.invariant_violations().is_empty());
}
