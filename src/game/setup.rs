//! Game initialization from deck lists
//!
//! Creates the opening snapshot: players and their zones, shuffled
//! libraries, opening hands, and optionally cards placed straight into a
//! zone (puzzle-style setups).

use crate::core::{AbilityRegistry, DefinitionId, PlayerId};
use crate::game::{EngineConfig, GameLogger, GameState, Step};
use crate::loader::CardDatabase;
use crate::zones::Zone;
use crate::{MtgError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One line of a deck list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub definition: DefinitionId,
    pub count: usize,
}

/// A main deck
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, definition: impl Into<DefinitionId>, count: usize) -> Self {
        self.entries.push(DeckEntry {
            definition: definition.into(),
            count,
        });
        self
    }

    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

struct PlayerSetup {
    name: String,
    deck: DeckList,
    placed: Vec<(DefinitionId, Zone)>,
}

/// Builder for the opening snapshot of a game
pub struct GameBuilder {
    card_db: Arc<CardDatabase>,
    registry: Arc<AbilityRegistry>,
    config: EngineConfig,
    logger: Option<Arc<GameLogger>>,
    players: Vec<PlayerSetup>,
    starting_step: Step,
}

impl GameBuilder {
    pub fn new(card_db: Arc<CardDatabase>, registry: Arc<AbilityRegistry>) -> Self {
        GameBuilder {
            card_db,
            registry,
            config: EngineConfig::default(),
            logger: None,
            players: Vec::new(),
            starting_step: Step::Untap,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this logger instead of one built from the config
    pub fn with_logger(mut self, logger: Arc<GameLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Seat a player; table order is the order of these calls
    pub fn add_player(mut self, name: &str, deck: DeckList) -> Self {
        self.players.push(PlayerSetup {
            name: name.to_string(),
            deck,
            placed: Vec::new(),
        });
        self
    }

    /// Put a card straight into a zone of the most recently added player,
    /// after libraries are shuffled and hands drawn
    ///
    /// Permanents placed this way are not summoning sick.
    pub fn with_card_in_zone(mut self, definition: impl Into<DefinitionId>, zone: Zone) -> Self {
        if let Some(player) = self.players.last_mut() {
            player.placed.push((definition.into(), zone));
        }
        self
    }

    /// Begin the game at this step of turn 1 instead of Untap
    pub fn starting_step(mut self, step: Step) -> Self {
        self.starting_step = step;
        self
    }

    pub fn build(self) -> Result<GameState> {
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(self.config.build_logger()));
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        let mut state = GameState::new(
            &names,
            &self.config,
            Arc::clone(&self.card_db),
            Arc::clone(&self.registry),
            logger,
        )?;
        let seats: Vec<PlayerId> = state.player_ids().to_vec();

        for (setup, &player_id) in self.players.iter().zip(&seats) {
            log_if_verbose!(
                state.logger,
                "{}: {} card deck",
                setup.name,
                setup.deck.total_cards()
            );
            let library = state.player_zone(player_id, Zone::Library)?;
            for entry in &setup.deck.entries {
                for _ in 0..entry.count {
                    match state.instantiate_card(&entry.definition, player_id, library) {
                        Ok(_) => {}
                        // Already logged as a content error
                        Err(MtgError::MissingCardDefinition(_)) => break,
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        let mut rng = ChaCha12Rng::seed_from_u64(self.config.rng_seed);
        for &player_id in &seats {
            let library = state.player_zone(player_id, Zone::Library)?;
            state.zones.get_mut(library)?.shuffle(&mut rng);
        }

        for &player_id in &seats {
            let library = state.player_zone(player_id, Zone::Library)?;
            for _ in 0..self.config.opening_hand_size {
                // A short deck means a short hand, not a loss
                if state.zone(library)?.is_empty() {
                    break;
                }
                state.draw_card(player_id)?;
            }
        }

        for (setup, &player_id) in self.players.iter().zip(&seats) {
            for (definition, zone) in &setup.placed {
                let zone_id = state.player_zone(player_id, *zone)?;
                match state.instantiate_card(definition, player_id, zone_id) {
                    Ok(card_id) => state.cards.get_mut(card_id)?.summoning_sick = false,
                    Err(MtgError::MissingCardDefinition(_)) => {}
                    Err(err) => return Err(err),
                }
            }
        }

        state.turn.current_step = self.starting_step;

        state.logger.normal(&format!(
            "Game started: {} (seed {})",
            names.join(" vs "),
            self.config.rng_seed
        ));
        Ok(state)
    }
}
