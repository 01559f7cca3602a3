//! Card definitions and card instances
//!
//! A `CardDefinition` is the printed card, shared by every copy and owned by
//! the card database. A `CardInstance` is one physical copy during a game;
//! its characteristics come from the definition it points at.

use crate::core::{
    AbilityId, AbilityKey, CardId, CardName, CounterType, DefinitionId, GameEntity, ManaCost,
    PlayerId, Subtype, ZoneId,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
    Planeswalker,
}

/// One ability line on a definition: which factory to use and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDeclaration {
    pub key: AbilityKey,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl AbilityDeclaration {
    pub fn new(key: impl Into<AbilityKey>, params: serde_json::Value) -> Self {
        AbilityDeclaration {
            key: key.into(),
            params,
        }
    }
}

/// Card definition (not yet instantiated in a game)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: DefinitionId,
    pub name: CardName,
    #[serde(default)]
    pub mana_cost: ManaCost,
    pub types: SmallVec<[CardType; 2]>,
    #[serde(default)]
    pub subtypes: SmallVec<[Subtype; 2]>,
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub toughness: Option<i32>,
    #[serde(default)]
    pub abilities: Vec<AbilityDeclaration>,
}

impl CardDefinition {
    pub fn new(id: impl Into<DefinitionId>, name: impl Into<CardName>) -> Self {
        CardDefinition {
            id: id.into(),
            name: name.into(),
            mana_cost: ManaCost::new(),
            types: SmallVec::new(),
            subtypes: SmallVec::new(),
            power: None,
            toughness: None,
            abilities: Vec::new(),
        }
    }

    /// A basic land with no abilities
    pub fn land(id: impl Into<DefinitionId>, name: impl Into<CardName>) -> Self {
        CardDefinition::new(id, name).with_type(CardType::Land)
    }

    /// A vanilla creature
    pub fn creature(
        id: impl Into<DefinitionId>,
        name: impl Into<CardName>,
        power: i32,
        toughness: i32,
    ) -> Self {
        let mut def = CardDefinition::new(id, name).with_type(CardType::Creature);
        def.power = Some(power);
        def.toughness = Some(toughness);
        def
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    pub fn with_mana_cost(mut self, cost: &str) -> Self {
        self.mana_cost = ManaCost::from_string(cost);
        self
    }

    pub fn with_ability(mut self, key: impl Into<AbilityKey>, params: serde_json::Value) -> Self {
        self.abilities.push(AbilityDeclaration::new(key, params));
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }
}

/// Ability ids on an instance, split by capability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardAbilities {
    pub static_abilities: SmallVec<[AbilityId; 2]>,
    pub triggered: SmallVec<[AbilityId; 2]>,
    pub activated: SmallVec<[AbilityId; 2]>,
}

impl CardAbilities {
    pub fn all(&self) -> impl Iterator<Item = AbilityId> + '_ {
        self.static_abilities
            .iter()
            .chain(self.triggered.iter())
            .chain(self.activated.iter())
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.static_abilities.is_empty() && self.triggered.is_empty() && self.activated.is_empty()
    }
}

/// A card in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInstance {
    /// Unique runtime handle for this copy
    pub id: CardId,

    /// Which printed card this is a copy of
    pub definition_id: DefinitionId,

    /// Name copied from the definition, for logs
    pub name: String,

    pub owner: PlayerId,

    /// Current controller (can differ from owner)
    pub controller: PlayerId,

    /// Zone whose card list contains this card
    pub current_zone: ZoneId,

    pub tapped: bool,

    pub damage: i32,

    /// Counters on this card; common ones are +1/+1 and -1/-1
    pub counters: SmallVec<[(CounterType, u32); 2]>,

    pub abilities: CardAbilities,

    /// Came under its controller's control this turn
    pub summoning_sick: bool,

    pub attacking: bool,
    pub blocking: bool,
}

impl CardInstance {
    pub fn new(
        id: CardId,
        definition: &CardDefinition,
        owner: PlayerId,
        zone: ZoneId,
    ) -> Self {
        CardInstance {
            id,
            definition_id: definition.id.clone(),
            name: definition.name.to_string(),
            owner,
            controller: owner,
            current_zone: zone,
            tapped: false,
            damage: 0,
            counters: SmallVec::new(),
            abilities: CardAbilities::default(),
            summoning_sick: false,
            attacking: false,
            blocking: false,
        }
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }

    pub fn add_counter(&mut self, counter_type: CounterType, amount: u32) {
        if amount == 0 {
            return;
        }
        if let Some((_, count)) = self.counters.iter_mut().find(|(t, _)| *t == counter_type) {
            *count += amount;
        } else {
            self.counters.push((counter_type, amount));
        }
    }

    /// Remove up to `amount` counters, returning how many were removed
    pub fn remove_counter(&mut self, counter_type: &CounterType, amount: u32) -> u32 {
        let Some(pos) = self.counters.iter().position(|(t, _)| t == counter_type) else {
            return 0;
        };
        let removed = amount.min(self.counters[pos].1);
        self.counters[pos].1 -= removed;
        if self.counters[pos].1 == 0 {
            self.counters.remove(pos);
        }
        removed
    }

    pub fn get_counter(&self, counter_type: &CounterType) -> u32 {
        self.counters
            .iter()
            .find(|(t, _)| t == counter_type)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    fn counter_modifier(&self) -> i32 {
        self.get_counter(&CounterType::plus_one_plus_one()) as i32
            - self.get_counter(&CounterType::minus_one_minus_one()) as i32
    }

    /// Current power (definition base plus counters)
    pub fn current_power(&self, definition: &CardDefinition) -> Option<i32> {
        definition.power.map(|base| base + self.counter_modifier())
    }

    /// Current toughness (definition base plus counters)
    pub fn current_toughness(&self, definition: &CardDefinition) -> Option<i32> {
        definition.toughness.map(|base| base + self.counter_modifier())
    }

    /// Reset everything that does not survive a zone change
    pub fn reset_for_zone_change(&mut self) {
        self.tapped = false;
        self.damage = 0;
        self.counters.clear();
        self.summoning_sick = false;
        self.attacking = false;
        self.blocking = false;
        self.controller = self.owner;
    }
}

impl GameEntity<CardInstance> for CardInstance {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
