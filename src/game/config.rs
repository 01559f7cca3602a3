//! Engine configuration

use crate::game::logger::{GameLogger, OutputMode, VerbosityLevel};
use serde::Deserialize;

/// Rules constants and runtime knobs for one game
///
/// Deserializable so a host can keep it in a config file; every field has a
/// default, so a partial document is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub starting_life: i32,
    pub max_lands_per_turn: u8,
    pub opening_hand_size: u8,
    /// The player taking turn 1 skips that turn's draw
    pub skip_first_draw: bool,
    /// SBA passes allowed before the checker gives up
    pub max_sba_iterations: u32,
    /// Extra SBA + event rounds allowed after the second event pass
    pub max_reaction_rounds: u32,
    /// Seed for library shuffles
    pub rng_seed: u64,
    pub verbosity: VerbosityLevel,
    pub output_mode: OutputMode,
    pub debug_state_hash: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            starting_life: 20,
            max_lands_per_turn: 1,
            opening_hand_size: 7,
            skip_first_draw: true,
            max_sba_iterations: 32,
            max_reaction_rounds: 4,
            rng_seed: 0,
            verbosity: VerbosityLevel::Normal,
            output_mode: OutputMode::Stdout,
            debug_state_hash: false,
        }
    }
}

impl EngineConfig {
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    pub fn with_max_lands_per_turn(mut self, lands: u8) -> Self {
        self.max_lands_per_turn = lands;
        self
    }

    pub fn with_opening_hand_size(mut self, size: u8) -> Self {
        self.opening_hand_size = size;
        self
    }

    pub fn with_skip_first_draw(mut self, skip: bool) -> Self {
        self.skip_first_draw = skip;
        self
    }

    pub fn with_max_sba_iterations(mut self, iterations: u32) -> Self {
        self.max_sba_iterations = iterations;
        self
    }

    pub fn with_max_reaction_rounds(mut self, rounds: u32) -> Self {
        self.max_reaction_rounds = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_debug_state_hash(mut self, enabled: bool) -> Self {
        self.debug_state_hash = enabled;
        self
    }

    /// Logger matching this configuration
    pub fn build_logger(&self) -> GameLogger {
        GameLogger::with_verbosity(self.verbosity)
            .with_output_mode(self.output_mode)
            .with_debug_state_hash(self.debug_state_hash)
    }
}
