//! Game entity system with typed integer IDs

use crate::{MtgError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Simple integer ID for game entities, tagged with the entity type
///
/// IDs are allocated from one counter per game, so a `CardId` and a
/// `PlayerId` never share a numeric value. The type parameter only exists
/// at compile time to stop ids of different entity kinds being mixed up.
pub struct EntityId<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityId<T> {
    pub const fn new(id: u32) -> Self {
        EntityId {
            id,
            _marker: PhantomData,
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.id
    }
}

// Manual impls: deriving would put bounds on T.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Serialize for EntityId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.id)
    }
}

impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(EntityId::new)
    }
}

/// Entities that know their own id, so a store can file them
pub trait GameEntity<T> {
    fn id(&self) -> EntityId<T>;
    fn name(&self) -> &str;
}

/// Central storage for one kind of entity
///
/// Both the map and every entity sit behind an `Arc`, so cloning a store
/// (and therefore a whole game snapshot) copies pointers only. `get_mut`
/// copies the map on first write if it is shared, then copies only the
/// entity being written. Older snapshots keep seeing their own values.
#[derive(Debug, Serialize)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct EntityStore<T> {
    entities: Arc<FxHashMap<EntityId<T>, Arc<T>>>,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: Arc::new(FxHashMap::default()),
        }
    }

    /// Get an entity by ID
    pub fn get(&self, id: EntityId<T>) -> Result<&T> {
        self.entities
            .get(&id)
            .map(|entity| entity.as_ref())
            .ok_or(MtgError::EntityNotFound(id.as_u32()))
    }

    /// Check if an entity exists
    pub fn contains(&self, id: EntityId<T>) -> bool {
        self.entities.contains_key(&id)
    }

    /// Iterate over all entities (unspecified order)
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId<T>, &T)> {
        self.entities.iter().map(|(id, entity)| (id, entity.as_ref()))
    }

    /// All ids in ascending order, for deterministic sweeps
    pub fn sorted_ids(&self) -> Vec<EntityId<T>> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Get count of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// True if both stores still share the same backing map
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entities, &other.entities)
    }
}

impl<T: Clone> EntityStore<T> {
    /// Insert an entity with a specific ID
    pub fn insert(&mut self, id: EntityId<T>, entity: T) {
        Arc::make_mut(&mut self.entities).insert(id, Arc::new(entity));
    }

    /// Get a mutable reference to an entity, copying it if it is shared
    pub fn get_mut(&mut self, id: EntityId<T>) -> Result<&mut T> {
        Arc::make_mut(&mut self.entities)
            .get_mut(&id)
            .map(Arc::make_mut)
            .ok_or(MtgError::EntityNotFound(id.as_u32()))
    }
}

impl<T> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        EntityStore {
            entities: Arc::clone(&self.entities),
        }
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GameEntity<T> + Clone> EntityStore<T> {
    /// Insert an entity under its own id
    pub fn add(&mut self, entity: T) -> EntityId<T> {
        let id = entity.id();
        self.insert(id, entity);
        id
    }
}

impl<T: PartialEq> PartialEq for EntityStore<T> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.entities, &other.entities) {
            return true;
        }
        self.entities.len() == other.entities.len()
            && self.entities.iter().all(|(id, entity)| {
                other
                    .entities
                    .get(id)
                    .is_some_and(|theirs| Arc::ptr_eq(entity, theirs) || entity == theirs)
            })
    }
}
