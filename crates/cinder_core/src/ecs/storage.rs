// storage.rs - Packed per-type component storage
//
// One ComponentArray per registered component type. Values live in a dense
// Vec with no holes; removal is swap-and-pop, so slot indices are unstable
// and never leave this module.

use crate::ecs::{Component, EcsError, Entity};
use std::any::Any;
use std::collections::HashMap;

/// Dense storage for all values of one component type.
///
/// `values[i]` belongs to `slot_to_entity[i]`, and
/// `entity_to_slot[slot_to_entity[i]] == i` for every `i < len()`.
pub struct ComponentArray<T: Component> {
    values: Vec<T>,
    slot_to_entity: Vec<Entity>,
    entity_to_slot: HashMap<Entity, usize>,
}

impl<T: Component> ComponentArray<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            slot_to_entity: Vec::new(),
            entity_to_slot: HashMap::new(),
        }
    }

    /// Append `value` for `entity`.
    ///
    /// If `entity` already holds a value it is replaced in place and the old
    /// value is returned.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&slot) = self.entity_to_slot.get(&entity) {
            return Some(std::mem::replace(&mut self.values[slot], value));
        }
        let slot = self.values.len();
        self.values.push(value);
        self.slot_to_entity.push(entity);
        self.entity_to_slot.insert(entity, slot);
        None
    }

    /// Swap-remove `entity`'s value, moving the last value into its slot.
    pub fn remove(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.take(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            name: T::NAME,
        })
    }

    fn take(&mut self, entity: Entity) -> Option<T> {
        let slot = self.entity_to_slot.remove(&entity)?;
        let value = self.values.swap_remove(slot);
        self.slot_to_entity.swap_remove(slot);
        if let Some(&moved) = self.slot_to_entity.get(slot) {
            self.entity_to_slot.insert(moved, slot);
        }
        Some(value)
    }

    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        self.try_get(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            name: T::NAME,
        })
    }

    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.try_get_mut(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            name: T::NAME,
        })
    }

    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        let slot = *self.entity_to_slot.get(&entity)?;
        self.values.get(slot)
    }

    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.entity_to_slot.get(&entity)?;
        self.values.get_mut(slot)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_slot.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only pass over `(entity, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.slot_to_entity.iter().copied().zip(&self.values)
    }

    /// In-place pass over `(entity, value)` pairs. Only values can change;
    /// the set of entities cannot.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.slot_to_entity.iter().copied().zip(self.values.iter_mut())
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.values.len(), self.slot_to_entity.len());
        assert_eq!(self.values.len(), self.entity_to_slot.len());
        for (slot, entity) in self.slot_to_entity.iter().enumerate() {
            assert_eq!(self.entity_to_slot.get(entity), Some(&slot));
        }
    }
}

impl<T: Component> Default for ComponentArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentArray`], held by the coordinator in a
/// list indexed by component type id.
pub trait ErasedStorage: Any {
    /// Drop the entity's value if it has one.
    fn entity_destroyed(&mut self, entity: Entity);

    fn contains(&self, entity: Entity) -> bool;

    fn len(&self) -> usize;

    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentArray<T> {
    fn entity_destroyed(&mut self, entity: Entity) {
        self.take(entity);
    }

    fn contains(&self, entity: Entity) -> bool {
        ComponentArray::contains(self, entity)
    }

    fn len(&self) -> usize {
        ComponentArray::len(self)
    }

    fn component_name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
