// coordinator.rs - The ECS facade
//
// Composes the entity registry, component type registry, per-type storages
// and system registry, and keeps signatures, storage contents and system
// entity sets consistent on every mutation.

use crate::ecs::system_registry::SystemRegistry;
use crate::ecs::{
    CommandBuffer, Component, ComponentArray, ComponentSet, ComponentType, ComponentTypeRegistry,
    EcsError, Entity, EntityBuilder, EntityRegistry, ErasedStorage, Signature, System,
    SystemContext, SystemHandle,
};
use std::collections::BTreeSet;
use tracing::trace;

/// The only object gameplay code talks to.
///
/// There is no global instance: build one, then lend it to whatever needs it.
pub struct Coordinator {
    entities: EntityRegistry,
    component_types: ComponentTypeRegistry,
    /// Indexed by `ComponentType::index()`.
    storages: Vec<Box<dyn ErasedStorage>>,
    systems: SystemRegistry,
}

impl Coordinator {
    /// Coordinator with the full `MAX_ENTITIES` id pool.
    pub fn new() -> Self {
        Self::from_entities(EntityRegistry::new())
    }

    /// Coordinator whose id pool holds `capacity` entities
    /// (`1..=MAX_ENTITIES`).
    pub fn with_entity_capacity(capacity: usize) -> Result<Self, EcsError> {
        Ok(Self::from_entities(EntityRegistry::with_capacity(capacity)?))
    }

    fn from_entities(entities: EntityRegistry) -> Self {
        Self {
            entities,
            component_types: ComponentTypeRegistry::new(),
            storages: Vec::new(),
            systems: SystemRegistry::new(),
        }
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        self.entities.create()
    }

    /// Destroy `entity`, dropping its components and removing it from every
    /// system before its id goes back to the pool.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.entities.ensure_alive(entity)?;
        for storage in &mut self.storages {
            storage.entity_destroyed(entity);
        }
        self.systems.entity_destroyed(entity);
        self.entities.destroy(entity)
    }

    /// Create an entity and attach every component queued in `builder`.
    ///
    /// Either all components are attached or the entity is destroyed again
    /// and the error returned.
    pub fn spawn(&mut self, builder: EntityBuilder) -> Result<Entity, EcsError> {
        let entity = self.create_entity()?;
        if let Err(err) = builder.attach_to(self, entity) {
            self.destroy_entity(entity)?;
            return Err(err);
        }
        trace!(%entity, "entity spawned");
        Ok(entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.entities.signature(entity)
    }

    pub fn living_entity_count(&self) -> usize {
        self.entities.living()
    }

    pub fn entity_capacity(&self) -> usize {
        self.entities.capacity()
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Register `T` and allocate its storage.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentType, EcsError> {
        let id = self.component_types.register::<T>()?;
        debug_assert_eq!(id.index(), self.storages.len());
        self.storages.push(Box::new(ComponentArray::<T>::new()));
        Ok(id)
    }

    pub fn component_type<T: Component>(&self) -> Result<ComponentType, EcsError> {
        self.component_types.get::<T>()
    }

    /// Signature with one bit per member of the tuple `C`.
    pub fn signature_of<C: ComponentSet>(&self) -> Result<Signature, EcsError> {
        C::signature(&self.component_types)
    }

    /// Attach `value` to `entity` and re-route it through the systems.
    ///
    /// If the entity already holds a `T`, the value is replaced in place and
    /// its signature is left alone.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        self.entities.ensure_alive(entity)?;
        let id = self.component_types.get::<T>()?;
        if self.storage_mut::<T>(id)?.insert(entity, value).is_some() {
            return Ok(());
        }

        let mut signature = self.entities.signature(entity)?;
        signature.set(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Detach `T` from `entity`, returning the removed value.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.entities.ensure_alive(entity)?;
        let id = self.component_types.get::<T>()?;
        let value = self.storage_mut::<T>(id)?.remove(entity)?;

        let mut signature = self.entities.signature(entity)?;
        signature.clear(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(value)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.entities.ensure_alive(entity)?;
        self.storage::<T>()?.get(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.entities.ensure_alive(entity)?;
        let id = self.component_types.get::<T>()?;
        self.storage_mut::<T>(id)?.get_mut(entity)
    }

    /// Cheap lookup for when absence is an expected outcome.
    pub fn try_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.storage::<T>().ok()?.try_get(entity)
    }

    pub fn try_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let id = self.component_types.get::<T>().ok()?;
        self.storage_mut::<T>(id).ok()?.try_get_mut(entity)
    }

    /// False for dead entities and unregistered types as well.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
            && self
                .storage::<T>()
                .is_ok_and(|storage| storage.contains(entity))
    }

    /// Number of entities currently holding a `T`.
    pub fn component_count<T: Component>(&self) -> Result<usize, EcsError> {
        Ok(self.storage::<T>()?.len())
    }

    /// Read-only pass over every `(entity, &T)` pair.
    pub fn components<T: Component>(
        &self,
    ) -> Result<impl Iterator<Item = (Entity, &T)> + '_, EcsError> {
        Ok(self.storage::<T>()?.iter())
    }

    fn storage<T: Component>(&self) -> Result<&ComponentArray<T>, EcsError> {
        let id = self.component_types.get::<T>()?;
        self.storages
            .get(id.index())
            .and_then(|storage| storage.as_any().downcast_ref::<ComponentArray<T>>())
            .ok_or(EcsError::ComponentNotRegistered { name: T::NAME })
    }

    fn storage_mut<T: Component>(
        &mut self,
        id: ComponentType,
    ) -> Result<&mut ComponentArray<T>, EcsError> {
        self.storages
            .get_mut(id.index())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<ComponentArray<T>>())
            .ok_or(EcsError::ComponentNotRegistered { name: T::NAME })
    }

    // ------------------------------------------------------------------
    // Systems
    // ------------------------------------------------------------------

    pub fn register_system<S: System>(&mut self, system: S) -> Result<SystemHandle, EcsError> {
        self.systems.register(system)
    }

    /// Declare which components `S` requires. Entities that already exist
    /// are routed against the new requirement immediately.
    pub fn set_system_signature<S: System>(&mut self, required: Signature) -> Result<(), EcsError> {
        let handle = self.systems.handle_of::<S>()?;
        self.systems
            .set_signature(handle, required, self.entities.iter());
        Ok(())
    }

    /// `None` until [`Coordinator::set_system_signature`] has been called.
    pub fn system_signature<S: System>(&self) -> Result<Option<Signature>, EcsError> {
        let handle = self.systems.handle_of::<S>()?;
        Ok(self.systems.signature(handle))
    }

    /// The live entities currently matching `S`'s signature.
    pub fn system_entities<S: System>(&self) -> Result<&BTreeSet<Entity>, EcsError> {
        let handle = self.systems.handle_of::<S>()?;
        Ok(self.systems.entities(handle))
    }

    pub fn system<S: System>(&self) -> Result<&S, EcsError> {
        self.systems.get::<S>()
    }

    pub fn system_mut<S: System>(&mut self) -> Result<&mut S, EcsError> {
        self.systems.get_mut::<S>()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Run one update of `S`, then apply the commands it recorded.
    pub fn run_system<S: System>(&mut self, dt: f32) -> Result<(), EcsError> {
        let handle = self.systems.handle_of::<S>()?;
        self.run_handle(handle, dt)
    }

    /// Run every system once, in registration order. Each system's commands
    /// are applied before the next system starts.
    ///
    /// A failing system does not stop the ones after it; the first error is
    /// returned once all of them have run.
    pub fn run_systems(&mut self, dt: f32) -> Result<(), EcsError> {
        let handles: Vec<SystemHandle> = self.systems.handles().collect();
        let mut first_error = None;
        for handle in handles {
            if let Err(err) = self.run_handle(handle, dt) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn run_handle(&mut self, handle: SystemHandle, dt: f32) -> Result<(), EcsError> {
        let (mut instance, entities) = self.systems.check_out(handle)?;
        trace!(
            system = self.systems.name(handle).unwrap_or("<unknown>"),
            entities = entities.len(),
            "running system"
        );

        let mut commands = CommandBuffer::new();
        instance.update(&mut SystemContext::new(&entities, self, &mut commands), dt);
        self.systems.check_in(handle, instance, entities);
        commands.apply(self)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
