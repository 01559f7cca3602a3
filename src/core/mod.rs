//! Core game types and entities

pub mod abilities;
pub mod ability;
pub mod card;
pub mod costs;
pub mod effects;
pub mod entity;
pub mod mana;
pub mod player;
pub mod types;

pub use ability::{
    Ability, AbilityFactory, AbilityKind, AbilityParams, AbilityRegistry, ActivatedAbility,
    Capability, StaticAbility, TriggeredAbility,
};
pub use card::{AbilityDeclaration, CardAbilities, CardDefinition, CardInstance, CardType};
pub use costs::Cost;
pub use effects::{apply_effect, Effect, TargetRef};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use mana::{Color, ManaCost, ManaPool};
pub use player::{LossReason, Player, PlayerZones};
pub use types::{AbilityKey, CardName, CounterType, DefinitionId, PlayerName, Subtype};

/// Type aliases for common entity IDs
pub type PlayerId = EntityId<Player>;
pub type CardId = EntityId<CardInstance>;
pub type ZoneId = EntityId<crate::zones::CardZone>;
pub type AbilityId = EntityId<Ability>;
