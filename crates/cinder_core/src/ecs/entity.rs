//! Entity handles and the registry that hands them out.
//!
//! Entities are plain 32-bit ids drawn from a fixed pool. They carry no data;
//! what an entity "is" lives entirely in its [`Signature`] and in the
//! component storages keyed by its id.

use crate::ecs::{EcsError, Signature, MAX_ENTITIES};
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Entity handle (opaque id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Wrap a raw id. The id is not checked against any registry.
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns the entity id space and each entity's composition signature.
///
/// Ids are recycled first-in first-out: a destroyed id goes to the back of
/// the queue, so it is handed out again only after every id that was free
/// before it.
pub struct EntityRegistry {
    available: VecDeque<Entity>,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    living: usize,
}

impl EntityRegistry {
    /// Registry with the full `MAX_ENTITIES` pool.
    pub fn new() -> Self {
        Self::build(MAX_ENTITIES)
    }

    /// Registry with a smaller pool of `capacity` ids.
    pub fn with_capacity(capacity: usize) -> Result<Self, EcsError> {
        if capacity == 0 || capacity > MAX_ENTITIES {
            return Err(EcsError::InvalidEntityCapacity {
                requested: capacity,
            });
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        Self {
            available: (0..capacity as u32).map(Entity).collect(),
            signatures: vec![Signature::EMPTY; capacity],
            alive: vec![false; capacity],
            living: 0,
        }
    }

    /// Pop the next free id.
    pub fn create(&mut self) -> Result<Entity, EcsError> {
        let entity = self
            .available
            .pop_front()
            .ok_or(EcsError::EntityCapacityExceeded {
                capacity: self.capacity(),
            })?;
        self.alive[entity.index()] = true;
        self.living += 1;
        trace!(%entity, living = self.living, "entity created");
        Ok(entity)
    }

    /// Clear the entity's signature and return its id to the pool.
    ///
    /// Storages and system sets are not touched here; the coordinator fans
    /// the destruction out to them before calling this.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        self.signatures[entity.index()] = Signature::EMPTY;
        self.alive[entity.index()] = false;
        self.available.push_back(entity);
        self.living -= 1;
        trace!(%entity, living = self.living, "entity destroyed");
        Ok(())
    }

    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.signatures[entity.index()])
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    pub fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity { entity })
        }
    }

    /// Number of entities currently alive.
    pub fn living(&self) -> usize {
        self.living
    }

    /// Size of the id pool.
    pub fn capacity(&self) -> usize {
        self.alive.len()
    }

    /// Live entities with their signatures, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.alive
            .iter()
            .zip(&self.signatures)
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(idx, (_, sig))| (Entity(idx as u32), *sig))
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
