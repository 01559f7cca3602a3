//! Game state snapshot
//!
//! A `GameState` is a value. Cloning one is cheap: every entity collection
//! is an `EntityStore`, which shares its storage until written. Code that
//! produces a new snapshot clones the input, edits the clone, and hands the
//! clone back; a snapshot that has been returned to a caller is never
//! edited again.

use crate::core::{
    Ability, AbilityRegistry, CardDefinition, CardId, CardInstance, DefinitionId, EntityId,
    EntityStore, Player, PlayerId, PlayerZones, ZoneId,
};
use crate::game::{EngineConfig, GameLogger, Phase, Step, TurnStructure};
use crate::loader::CardDatabase;
use crate::zones::{CardZone, Zone};
use crate::{MtgError, Result};
use serde::Serialize;
use std::sync::Arc;

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub players: EntityStore<Player>,

    /// Table order; turn and priority rotate through it
    pub turn_order: Vec<PlayerId>,

    pub zones: EntityStore<CardZone>,

    pub cards: EntityStore<CardInstance>,

    /// Every ability object, keyed by the ids card instances refer to
    pub abilities: EntityStore<Ability>,

    pub turn: TurnStructure,

    /// The game-owned stack zone
    pub stack_zone: ZoneId,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,

    /// Card-definition lookup supplied at setup
    #[serde(skip)]
    pub card_db: Arc<CardDatabase>,

    /// Ability factories supplied at setup
    #[serde(skip)]
    pub registry: Arc<AbilityRegistry>,

    #[serde(skip)]
    pub logger: Arc<GameLogger>,
}

impl GameState {
    /// Create a game with the given players in table order, each with five
    /// empty zones, plus the shared stack
    pub fn new(
        player_names: &[&str],
        config: &EngineConfig,
        card_db: Arc<CardDatabase>,
        registry: Arc<AbilityRegistry>,
        logger: Arc<GameLogger>,
    ) -> Result<Self> {
        if player_names.len() < 2 {
            return Err(MtgError::InvalidAction(format!(
                "a game needs at least two players, got {}",
                player_names.len()
            )));
        }

        let mut state = GameState {
            players: EntityStore::new(),
            turn_order: Vec::with_capacity(player_names.len()),
            zones: EntityStore::new(),
            cards: EntityStore::new(),
            abilities: EntityStore::new(),
            turn: TurnStructure::new(PlayerId::new(0)),
            stack_zone: ZoneId::new(0),
            next_entity_id: 0,
            card_db,
            registry,
            logger,
        };

        for name in player_names {
            let player_id: PlayerId = state.next_id();
            let zones = PlayerZones {
                library: state.add_zone(Zone::Library, Some(player_id)),
                hand: state.add_zone(Zone::Hand, Some(player_id)),
                graveyard: state.add_zone(Zone::Graveyard, Some(player_id)),
                exile: state.add_zone(Zone::Exile, Some(player_id)),
                battlefield: state.add_zone(Zone::Battlefield, Some(player_id)),
            };
            let mut player = Player::new(player_id, *name, config.starting_life, zones);
            player.max_lands_per_turn = config.max_lands_per_turn;
            state.players.add(player);
            state.turn_order.push(player_id);
        }
        state.stack_zone = state.add_zone(Zone::Stack, None);
        state.turn = TurnStructure::new(state.turn_order[0]);

        Ok(state)
    }

    fn add_zone(&mut self, zone_type: Zone, owner: Option<PlayerId>) -> ZoneId {
        let id = self.next_id();
        self.zones.add(CardZone::new(id, zone_type, owner))
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(id)
    }

    /// Players in table order
    pub fn player_ids(&self) -> &[PlayerId] {
        &self.turn_order
    }

    /// The next player after `current` in table order, wrapping
    ///
    /// Players who have lost are passed over while anyone else is left.
    pub fn next_player_after(&self, current: PlayerId) -> Result<PlayerId> {
        let idx = self
            .turn_order
            .iter()
            .position(|&id| id == current)
            .ok_or(MtgError::EntityNotFound(current.as_u32()))?;
        let count = self.turn_order.len();
        let candidates = (1..=count).map(|offset| self.turn_order[(idx + offset) % count]);
        let mut fallback = None;
        for candidate in candidates {
            if fallback.is_none() {
                fallback = Some(candidate);
            }
            if self.players.get(candidate).is_ok_and(|p| !p.has_lost) {
                return Ok(candidate);
            }
        }
        fallback.ok_or(MtgError::EntityNotFound(current.as_u32()))
    }

    /// Every player other than `player`, in table order
    pub fn opponents(&self, player: PlayerId) -> impl Iterator<Item = PlayerId> + '_ {
        self.turn_order.iter().copied().filter(move |&id| id != player)
    }

    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    pub fn priority_player(&self) -> PlayerId {
        self.turn.priority_player
    }

    pub fn step(&self) -> Step {
        self.turn.current_step
    }

    pub fn phase(&self) -> Phase {
        self.turn.current_phase()
    }

    pub fn zone(&self, id: ZoneId) -> Result<&CardZone> {
        self.zones.get(id)
    }

    /// Kind of zone the card currently sits in
    pub fn zone_type_of(&self, card_id: CardId) -> Option<Zone> {
        let card = self.cards.get(card_id).ok()?;
        self.zones.get(card.current_zone).ok().map(|zone| zone.zone_type)
    }

    /// The personal zone of the given kind; `Zone::Stack` is the shared stack
    pub fn player_zone(&self, player: PlayerId, zone_type: Zone) -> Result<ZoneId> {
        if zone_type == Zone::Stack {
            return Ok(self.stack_zone);
        }
        let zones = self.get_player(player)?.zones;
        Ok(match zone_type {
            Zone::Library => zones.library,
            Zone::Hand => zones.hand,
            Zone::Graveyard => zones.graveyard,
            Zone::Exile => zones.exile,
            Zone::Battlefield | Zone::Stack => zones.battlefield,
        })
    }

    /// The zone a card goes to when sent to `zone_type`
    ///
    /// Battlefield means its controller's battlefield; other personal zones
    /// belong to the owner.
    pub fn destination_zone(&self, card_id: CardId, zone_type: Zone) -> Result<ZoneId> {
        let card = self.cards.get(card_id)?;
        let player = match zone_type {
            Zone::Battlefield => card.controller,
            _ => card.owner,
        };
        self.player_zone(player, zone_type)
    }

    pub fn definition(&self, card_id: CardId) -> Option<&Arc<CardDefinition>> {
        let card = self.cards.get(card_id).ok()?;
        self.card_db.get_card(&card.definition_id)
    }

    pub fn is_creature(&self, card_id: CardId) -> bool {
        self.definition(card_id).is_some_and(|def| def.is_creature())
    }

    pub fn is_land(&self, card_id: CardId) -> bool {
        self.definition(card_id).is_some_and(|def| def.is_land())
    }

    /// Toughness including counters; `None` for non-creatures
    pub fn effective_toughness(&self, card_id: CardId) -> Option<i32> {
        let def = self.definition(card_id)?;
        if !def.is_creature() {
            return None;
        }
        self.cards.get(card_id).ok()?.current_toughness(def)
    }

    /// Every card on any battlefield, in table order then zone order
    pub fn battlefield_cards(&self) -> Vec<CardId> {
        self.turn_order
            .iter()
            .filter_map(|&id| self.players.get(id).ok())
            .filter_map(|player| self.zones.get(player.zones.battlefield).ok())
            .flat_map(|zone| zone.cards.iter().copied())
            .collect()
    }

    /// Move a card to another zone
    ///
    /// Removal from the source, insertion at the destination and the card's
    /// `current_zone` change together. Leaving the battlefield wipes damage,
    /// counters, tapped state and control changes.
    pub fn move_card(&mut self, card_id: CardId, to: ZoneId) -> Result<()> {
        let from = self.cards.get(card_id)?.current_zone;
        if from == to {
            return Ok(());
        }
        let to_type = self.zone(to)?.zone_type;
        let from_type = self.zone(from)?.zone_type;

        if !self.zones.get_mut(from)?.remove(card_id) {
            return Err(MtgError::InvalidAction(format!(
                "Card {card_id} not found in source zone"
            )));
        }
        self.zones.get_mut(to)?.add(card_id);

        let card = self.cards.get_mut(card_id)?;
        card.current_zone = to;
        if from_type == Zone::Battlefield && to_type != Zone::Battlefield {
            card.reset_for_zone_change();
        }
        if to_type == Zone::Battlefield && from_type != Zone::Battlefield {
            card.summoning_sick = true;
        }
        Ok(())
    }

    /// Move a card to the zone of the given kind that it belongs in
    pub fn move_card_to(&mut self, card_id: CardId, zone_type: Zone) -> Result<()> {
        let to = self.destination_zone(card_id, zone_type)?;
        self.move_card(card_id, to)
    }

    /// Draw the top card of a library
    ///
    /// An empty library flags the player instead; the state-based action
    /// check turns that flag into a loss.
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<Option<CardId>> {
        let zones = self.get_player(player_id)?.zones;
        match self.zone(zones.library)?.peek_top() {
            Some(card_id) => {
                self.move_card(card_id, zones.hand)?;
                Ok(Some(card_id))
            }
            None => {
                self.players.get_mut(player_id)?.drew_from_empty_library = true;
                Ok(None)
            }
        }
    }

    /// Create a card instance from a definition and put it into `zone`
    ///
    /// Abilities are built through the registry. An ability whose key is
    /// unknown or whose parameters are bad is logged and left off the card;
    /// the card itself is still created.
    pub fn instantiate_card(
        &mut self,
        definition_id: &DefinitionId,
        owner: PlayerId,
        zone: ZoneId,
    ) -> Result<CardId> {
        let Some(definition) = self.card_db.get_card(definition_id).cloned() else {
            self.logger
                .content_error(&format!("No card definition '{definition_id}'"));
            return Err(MtgError::MissingCardDefinition(definition_id.to_string()));
        };
        self.get_player(owner)?;
        self.zone(zone)?;

        let card_id: CardId = self.next_id();
        let mut card = CardInstance::new(card_id, &definition, owner, zone);
        if self.zone(zone)?.zone_type == Zone::Battlefield {
            card.summoning_sick = true;
        }
        self.cards.add(card);
        self.zones.get_mut(zone)?.add(card_id);

        for declaration in &definition.abilities {
            let kind = match self
                .registry
                .build(&declaration.key, &declaration.params, card_id, self)
            {
                Ok(kind) => kind,
                Err(err) => {
                    self.logger.content_error(&format!(
                        "{} ({definition_id}): ability skipped: {err}",
                        definition.name
                    ));
                    continue;
                }
            };

            let ability_id = self.next_id();
            let capability = kind.capability();
            self.abilities.insert(
                ability_id,
                Ability {
                    id: ability_id,
                    key: declaration.key.clone(),
                    source: card_id,
                    params: declaration.params.clone(),
                    kind,
                },
            );
            let abilities = &mut self.cards.get_mut(card_id)?.abilities;
            match capability {
                crate::core::Capability::Static => abilities.static_abilities.push(ability_id),
                crate::core::Capability::Triggered => abilities.triggered.push(ability_id),
                crate::core::Capability::Activated => abilities.activated.push(ability_id),
            }
        }

        Ok(card_id)
    }

    /// Check if the game is over
    pub fn is_game_over(&self) -> bool {
        self.players.iter().filter(|(_, p)| !p.has_lost).count() <= 1
    }

    /// Get the winner (if game is over)
    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_game_over() {
            return None;
        }
        self.turn_order
            .iter()
            .copied()
            .find(|&id| self.players.get(id).is_ok_and(|p| !p.has_lost))
    }

    /// True when nothing sits in the stack zone
    pub fn stack_is_empty(&self) -> bool {
        self.zone(self.stack_zone).map_or(true, CardZone::is_empty)
    }

    /// Describe every broken structural invariant; empty when consistent
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let mut seen: rustc_hash::FxHashMap<CardId, Vec<ZoneId>> = Default::default();
        for zone_id in self.zones.sorted_ids() {
            if let Ok(zone) = self.zones.get(zone_id) {
                for &card_id in &zone.cards {
                    seen.entry(card_id).or_default().push(zone_id);
                }
            }
        }

        for card_id in self.cards.sorted_ids() {
            let Ok(card) = self.cards.get(card_id) else {
                continue;
            };
            match seen.get(&card_id).map(Vec::as_slice) {
                Some([only]) if *only == card.current_zone => {}
                Some([only]) => violations.push(format!(
                    "card {card_id} is in zone {only} but records zone {}",
                    card.current_zone
                )),
                Some(many) => violations.push(format!("card {card_id} is in zones {many:?}")),
                None => violations.push(format!("card {card_id} is in no zone")),
            }
            for ability_id in card.abilities.all() {
                match self.abilities.get(ability_id) {
                    Ok(ability) if ability.source == card_id => {}
                    Ok(_) => violations.push(format!(
                        "ability {ability_id} on card {card_id} belongs to another card"
                    )),
                    Err(_) => violations.push(format!(
                        "card {card_id} refers to unregistered ability {ability_id}"
                    )),
                }
            }
        }

        for card_id in seen.keys() {
            if !self.cards.contains(*card_id) {
                violations.push(format!("zone lists unknown card {card_id}"));
            }
        }

        if !self.players.contains(self.turn.active_player) {
            violations.push(format!(
                "active player {} is not in the game",
                self.turn.active_player
            ));
        }
        if !self.players.contains(self.turn.priority_player) {
            violations.push(format!(
                "priority player {} is not in the game",
                self.turn.priority_player
            ));
        }

        violations
    }

    /// Log a state fingerprint when the logger asks for it
    #[inline]
    pub fn debug_log_state_hash(&self, message: &str) {
        if self.logger.debug_state_hash_enabled() {
            use crate::game::{compute_state_hash, format_hash};
            let hash = compute_state_hash(self);
            self.logger
                .normal(&format!("[STATE:{}] {}", format_hash(hash), message));
        }
    }
}

// Collaborators (database, registry, logger) are not part of the value.
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.players == other.players
            && self.turn_order == other.turn_order
            && self.zones == other.zones
            && self.cards == other.cards
            && self.abilities == other.abilities
            && self.turn == other.turn
            && self.stack_zone == other.stack_zone
            && self.next_entity_id == other.next_entity_id
    }
}
