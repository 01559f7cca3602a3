//! Game state, turn structure and the action pipeline

pub mod actions;
pub mod config;
pub mod engine;
pub mod events;
pub mod logger;
pub mod phase;
pub mod priority;
pub mod sba;
pub mod setup;
pub mod state;
pub mod state_hash;
pub mod triggers;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::PlayerAction;
pub use config::EngineConfig;
pub use engine::Engine;
pub use events::{diff_events, EventBus, EventFilter, GameEvent, SubscriptionId};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use phase::{Phase, Step, TurnManager, TurnStructure};
pub use priority::PriorityManager;
pub use sba::{SbaDivergence, StateBasedAction, StateBasedActionChecker};
pub use setup::{DeckEntry, DeckList, GameBuilder};
pub use state::GameState;
pub use state_hash::{compute_state_hash, format_hash};
pub use triggers::TriggeredAbilityManager;
