//! Ability capability model and the ability registry
//!
//! Every ability is exactly one of Static, Triggered or Activated. The
//! capability is chosen by the factory that builds the ability and is fixed
//! for the ability's lifetime; nothing inspects an ability to guess it.
//!
//! Abilities are shared between snapshots behind `Arc`, so the traits are
//! `Send + Sync` and every method takes `&self`. An ability never mutates
//! the snapshot it is handed: it returns a new one.

use crate::core::effects::{apply_effect_in_place, Effect, TargetRef};
use crate::core::{AbilityId, AbilityKey, CardId, Cost, PlayerId};
use crate::game::{GameEvent, GameState};
use crate::{MtgError, Result};
use rustc_hash::FxHashMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Parameters handed to an ability factory, taken from the card definition
pub type AbilityParams = serde_json::Value;

/// Always-on ability. Continuous effects are not applied by this engine, so
/// a static ability only describes itself.
pub trait StaticAbility: Send + Sync + fmt::Debug {
    fn description(&self) -> String;
}

/// Ability that reacts to game events
pub trait TriggeredAbility: Send + Sync + fmt::Debug {
    /// Does `event` trigger this ability in `state`?
    fn check_trigger(&self, event: &GameEvent, state: &GameState) -> bool;

    /// Resolve the ability, returning the next snapshot
    fn resolve(&self, state: &GameState) -> GameState;

    fn description(&self) -> String;
}

/// Ability a player pays a cost to use
pub trait ActivatedAbility: Send + Sync + fmt::Debug {
    fn costs(&self) -> &[Cost];

    /// The effect this activation produces, or `None` if `target` is unusable
    fn effect(&self, state: &GameState, controller: PlayerId, target: TargetRef) -> Option<Effect>;

    /// Ability-specific restrictions; cost payability is checked separately
    fn can_activate(&self, state: &GameState, player: PlayerId, target: TargetRef) -> bool;

    fn description(&self) -> String;

    /// Pay every cost, then apply the effect
    ///
    /// Returns a copy of the input if any cost cannot be paid or the effect
    /// cannot be built.
    fn activate(
        &self,
        state: &GameState,
        player: PlayerId,
        source: CardId,
        target: TargetRef,
    ) -> GameState {
        let Some(effect) = self.effect(state, player, target) else {
            return state.clone();
        };
        let mut next = state.clone();
        for cost in self.costs() {
            if !cost.pay(&mut next, player, source) {
                return state.clone();
            }
        }
        match apply_effect_in_place(&mut next, &effect) {
            Ok(()) => next,
            Err(_) => state.clone(),
        }
    }
}

/// Capability tag, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    Static,
    Triggered,
    Activated,
}

/// The capability-specific behavior of an ability
#[derive(Debug, Clone)]
pub enum AbilityKind {
    Static(Arc<dyn StaticAbility>),
    Triggered(Arc<dyn TriggeredAbility>),
    Activated(Arc<dyn ActivatedAbility>),
}

impl AbilityKind {
    pub fn capability(&self) -> Capability {
        match self {
            AbilityKind::Static(_) => Capability::Static,
            AbilityKind::Triggered(_) => Capability::Triggered,
            AbilityKind::Activated(_) => Capability::Activated,
        }
    }

    pub fn description(&self) -> String {
        match self {
            AbilityKind::Static(a) => a.description(),
            AbilityKind::Triggered(a) => a.description(),
            AbilityKind::Activated(a) => a.description(),
        }
    }
}

/// A registered ability object belonging to one card instance
#[derive(Debug, Clone)]
pub struct Ability {
    pub id: AbilityId,
    pub key: AbilityKey,
    pub source: CardId,
    pub params: AbilityParams,
    pub kind: AbilityKind,
}

impl Ability {
    pub fn capability(&self) -> Capability {
        self.kind.capability()
    }

    pub fn as_triggered(&self) -> Option<&dyn TriggeredAbility> {
        match &self.kind {
            AbilityKind::Triggered(a) => Some(a.as_ref()),
            _ => None,
        }
    }

    pub fn as_activated(&self) -> Option<&dyn ActivatedAbility> {
        match &self.kind {
            AbilityKind::Activated(a) => Some(a.as_ref()),
            _ => None,
        }
    }
}

// Behavior objects have no value identity; two abilities are equal when
// they were built from the same declaration for the same card.
impl PartialEq for Ability {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.key == other.key
            && self.source == other.source
            && self.params == other.params
            && self.capability() == other.capability()
    }
}

impl Serialize for Ability {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Ability", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("params", &self.params)?;
        state.serialize_field("capability", &self.capability())?;
        state.end()
    }
}

/// Builds the behavior of one ability from its parameters, source card and
/// the snapshot the card is being created in
pub type AbilityFactory =
    Arc<dyn Fn(&AbilityParams, CardId, &GameState) -> Result<AbilityKind> + Send + Sync>;

/// Lookup from ability key to factory
///
/// Built once at setup and shared by reference with every snapshot of a
/// game; there is no process-wide registry.
#[derive(Clone, Default)]
pub struct AbilityRegistry {
    factories: FxHashMap<AbilityKey, AbilityFactory>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the abilities in `core::abilities`
    pub fn with_builtin_abilities() -> Self {
        let mut registry = Self::new();
        crate::core::abilities::register_builtins(&mut registry);
        registry
    }

    /// Register (or replace) a factory
    pub fn register<F>(&mut self, key: impl Into<AbilityKey>, factory: F)
    where
        F: Fn(&AbilityParams, CardId, &GameState) -> Result<AbilityKind> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
    }

    pub fn contains(&self, key: &AbilityKey) -> bool {
        self.factories.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the behavior for `key`
    pub fn build(
        &self,
        key: &AbilityKey,
        params: &AbilityParams,
        source: CardId,
        state: &GameState,
    ) -> Result<AbilityKind> {
        let factory = self
            .factories
            .get(key)
            .ok_or_else(|| MtgError::UnknownAbility(key.to_string()))?;
        factory(params, source, state)
    }
}

impl fmt::Debug for AbilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.factories.keys().map(AbilityKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("AbilityRegistry").field("keys", &keys).finish()
    }
}
