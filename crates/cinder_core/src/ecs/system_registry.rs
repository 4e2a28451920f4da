use crate::ecs::system::{system_name, StoredSystem};
use crate::ecs::{EcsError, Entity, Signature, System, SystemHandle};
use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Holds every registered system, its required signature, and the set of
/// live entities currently matching that signature.
pub(crate) struct SystemRegistry {
    systems: Vec<RegisteredSystem>,
    type_lookup: HashMap<TypeId, SystemHandle>,
}

struct RegisteredSystem {
    name: &'static str,
    /// `None` until a signature is declared; such a system matches nothing.
    required: Option<Signature>,
    entities: BTreeSet<Entity>,
    /// Taken out while the system is running.
    instance: Option<Box<dyn StoredSystem>>,
}

impl RegisteredSystem {
    fn matches(&self, signature: &Signature) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| signature.contains_all(required))
    }

    fn route(&mut self, entity: Entity, signature: &Signature) {
        if self.matches(signature) {
            self.entities.insert(entity);
        } else {
            self.entities.remove(&entity);
        }
    }
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            type_lookup: HashMap::new(),
        }
    }

    pub fn register<S: System>(&mut self, system: S) -> Result<SystemHandle, EcsError> {
        let name = system_name::<S>();
        let key = TypeId::of::<S>();
        if self.type_lookup.contains_key(&key) {
            return Err(EcsError::DuplicateSystem { name });
        }

        let handle = SystemHandle::new(self.systems.len() as u32);
        self.type_lookup.insert(key, handle);
        self.systems.push(RegisteredSystem {
            name,
            required: None,
            entities: BTreeSet::new(),
            instance: Some(Box::new(system)),
        });
        debug!(system = name, %handle, "system registered");
        Ok(handle)
    }

    pub fn handle_of<S: System>(&self) -> Result<SystemHandle, EcsError> {
        self.type_lookup
            .get(&TypeId::of::<S>())
            .copied()
            .ok_or(EcsError::SystemNotRegistered {
                name: system_name::<S>(),
            })
    }

    /// Record the required signature for `handle` and re-route every live
    /// entity against it.
    pub fn set_signature<I>(&mut self, handle: SystemHandle, required: Signature, live: I)
    where
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let system = &mut self.systems[handle.index() as usize];
        system.required = Some(required);
        system.entities.clear();
        for (entity, signature) in live {
            if signature.contains_all(&required) {
                system.entities.insert(entity);
            }
        }
        debug!(
            system = system.name,
            %required,
            matched = system.entities.len(),
            "system signature set"
        );
    }

    pub fn signature(&self, handle: SystemHandle) -> Option<Signature> {
        self.systems.get(handle.index() as usize)?.required
    }

    /// Re-evaluate `entity` against every system.
    pub fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for system in &mut self.systems {
            system.route(entity, &signature);
        }
    }

    pub fn entity_destroyed(&mut self, entity: Entity) {
        for system in &mut self.systems {
            system.entities.remove(&entity);
        }
    }

    pub fn entities(&self, handle: SystemHandle) -> &BTreeSet<Entity> {
        &self.systems[handle.index() as usize].entities
    }

    pub fn get<S: System>(&self) -> Result<&S, EcsError> {
        let handle = self.handle_of::<S>()?;
        let system = &self.systems[handle.index() as usize];
        system
            .instance
            .as_ref()
            .and_then(|instance| instance.as_any().downcast_ref::<S>())
            .ok_or(EcsError::SystemBusy { name: system.name })
    }

    pub fn get_mut<S: System>(&mut self) -> Result<&mut S, EcsError> {
        let handle = self.handle_of::<S>()?;
        let system = &mut self.systems[handle.index() as usize];
        let name = system.name;
        system
            .instance
            .as_mut()
            .and_then(|instance| instance.as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::SystemBusy { name })
    }

    /// Take a system's instance and entity set out for the length of one
    /// update. Must be paired with [`SystemRegistry::check_in`].
    pub fn check_out(
        &mut self,
        handle: SystemHandle,
    ) -> Result<(Box<dyn StoredSystem>, BTreeSet<Entity>), EcsError> {
        let system = &mut self.systems[handle.index() as usize];
        let instance = system
            .instance
            .take()
            .ok_or(EcsError::SystemBusy { name: system.name })?;
        Ok((instance, std::mem::take(&mut system.entities)))
    }

    pub fn check_in(
        &mut self,
        handle: SystemHandle,
        instance: Box<dyn StoredSystem>,
        entities: BTreeSet<Entity>,
    ) {
        let system = &mut self.systems[handle.index() as usize];
        system.instance = Some(instance);
        system.entities = entities;
    }

    pub fn name(&self, handle: SystemHandle) -> Option<&'static str> {
        self.systems.get(handle.index() as usize).map(|s| s.name)
    }

    pub fn handles(&self) -> impl Iterator<Item = SystemHandle> {
        (0..self.systems.len() as u32).map(SystemHandle::new)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }
}
