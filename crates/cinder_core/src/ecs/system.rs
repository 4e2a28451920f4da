//! Behaviour systems and the view they get of the world while running.

use crate::ecs::{CommandBuffer, Component, Coordinator, EcsError, Entity, Signature};
use std::any::Any;
use std::collections::BTreeSet;

/// A behaviour unit run over the entities matching its declared signature.
///
/// Systems are constructed by the caller with whatever they depend on and
/// handed to [`Coordinator::register_system`]. They never hold the
/// coordinator; it is lent to them through [`SystemContext`] for the length
/// of one update.
pub trait System: 'static {
    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f32);
}

/// Short type name used in logs and errors (`game::Movement` -> `Movement`).
pub(crate) fn system_name<S: 'static>() -> &'static str {
    let full = std::any::type_name::<S>();
    let path = full.split('<').next().unwrap_or(full);
    match path.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// Object-safe wrapper so the registry can store any `System` and still
/// downcast it back to its concrete type.
pub(crate) trait StoredSystem {
    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f32);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> StoredSystem for S {
    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {
        System::update(self, ctx, dt)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// What a system can see and do during [`System::update`].
///
/// Component values can be read and written by entity. Structural changes
/// (spawning, destroying, attaching or detaching components) go through
/// [`SystemContext::commands`] and are applied after the update returns, so
/// the entity set being iterated never changes underneath the system.
pub struct SystemContext<'a> {
    entities: &'a BTreeSet<Entity>,
    world: &'a mut Coordinator,
    commands: &'a mut CommandBuffer,
}

impl<'a> SystemContext<'a> {
    pub(crate) fn new(
        entities: &'a BTreeSet<Entity>,
        world: &'a mut Coordinator,
        commands: &'a mut CommandBuffer,
    ) -> Self {
        Self {
            entities,
            world,
            commands,
        }
    }

    /// Entities matching this system's signature, in id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + 'a {
        self.entities.iter().copied()
    }

    /// Snapshot of the matching entities, handy when the loop body needs
    /// `&mut self`.
    pub fn entity_list(&self) -> Vec<Entity> {
        self.entities.iter().copied().collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.world.get_component(entity)
    }

    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.world.get_component_mut(entity)
    }

    pub fn try_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.world.try_component(entity)
    }

    pub fn try_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.world.try_component_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.world.has_component::<T>(entity)
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.world.entity_signature(entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.is_alive(entity)
    }

    pub fn living_entity_count(&self) -> usize {
        self.world.living_entity_count()
    }

    /// Deferred structural changes, applied once this update returns.
    pub fn commands(&mut self) -> &mut CommandBuffer {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Movement;
    struct Wrapper<T>(T);

    #[test]
    fn names_drop_module_path() {
        assert_eq!(system_name::<Movement>(), "Movement");
        assert_eq!(system_name::<u32>(), "u32");
        assert!(system_name::<Wrapper<Movement>>().starts_with("Wrapper<"));
    }
}
