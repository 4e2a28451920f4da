//! Deferred structural changes.
//!
//! Systems must not change which entities hold which components while they
//! are walking their entity set: swap-remove reorders storage and the set
//! itself would be edited mid-iteration. Instead they record commands into a
//! [`CommandBuffer`], which the coordinator applies in recording order once
//! the system's update has returned.

use crate::ecs::{Component, Coordinator, EcsError, Entity, EntityBuilder};
use tracing::{trace, warn};

enum Command {
    Spawn(EntityBuilder),
    Destroy(Entity),
    Edit {
        entity: Entity,
        apply: Box<dyn FnOnce(&mut Coordinator, Entity) -> Result<(), EcsError>>,
    },
}

#[derive(Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue creation of an entity with the builder's components.
    pub fn spawn(&mut self, builder: EntityBuilder) {
        self.commands.push(Command::Spawn(builder));
    }

    pub fn destroy_entity(&mut self, entity: Entity) {
        self.commands.push(Command::Destroy(entity));
    }

    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) {
        self.commands.push(Command::Edit {
            entity,
            apply: Box::new(move |world: &mut Coordinator, entity: Entity| {
                world.add_component(entity, value)
            }),
        });
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        self.commands.push(Command::Edit {
            entity,
            apply: Box::new(|world: &mut Coordinator, entity: Entity| {
                world.remove_component::<T>(entity).map(drop)
            }),
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every queued command in order.
    ///
    /// A failing command does not stop the ones after it. Each failure is
    /// logged and the first one is returned.
    pub fn apply(self, world: &mut Coordinator) -> Result<(), EcsError> {
        if self.commands.is_empty() {
            return Ok(());
        }
        trace!(count = self.commands.len(), "applying deferred commands");

        let mut first_error = None;
        for command in self.commands {
            let result = match command {
                Command::Spawn(builder) => world.spawn(builder).map(drop),
                Command::Destroy(entity) => world.destroy_entity(entity),
                Command::Edit { entity, apply } => apply(world, entity),
            };
            if let Err(err) = result {
                warn!(error = %err, "deferred command failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_component;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tag(u8);
    define_component!(Tag);

    fn world() -> Coordinator {
        let mut world = Coordinator::with_entity_capacity(8).unwrap();
        world.register_component::<Tag>().unwrap();
        world
    }

    #[test]
    fn nothing_happens_until_applied() {
        let mut world = world();
        let entity = world.create_entity().unwrap();

        let mut commands = CommandBuffer::new();
        commands.add_component(entity, Tag(1));
        commands.spawn(EntityBuilder::new().with(Tag(2)));
        assert_eq!(commands.len(), 2);
        assert!(!world.has_component::<Tag>(entity));
        assert_eq!(world.living_entity_count(), 1);

        commands.apply(&mut world).unwrap();
        assert_eq!(world.get_component::<Tag>(entity), Ok(&Tag(1)));
        assert_eq!(world.living_entity_count(), 2);
        assert_eq!(world.component_count::<Tag>(), Ok(2));
    }

    #[test]
    fn applies_in_recording_order() {
        let mut world = world();
        let entity = world.create_entity().unwrap();

        let mut commands = CommandBuffer::new();
        commands.add_component(entity, Tag(1));
        commands.remove_component::<Tag>(entity);
        commands.add_component(entity, Tag(3));
        commands.apply(&mut world).unwrap();

        assert_eq!(world.get_component::<Tag>(entity), Ok(&Tag(3)));
    }

    #[test]
    fn failures_do_not_stop_later_commands() {
        let mut world = world();
        let doomed = world.create_entity().unwrap();
        let survivor = world.create_entity().unwrap();

        let mut commands = CommandBuffer::new();
        commands.destroy_entity(doomed);
        commands.destroy_entity(doomed);
        commands.add_component(survivor, Tag(9));

        assert_eq!(
            commands.apply(&mut world),
            Err(EcsError::InvalidEntity { entity: doomed })
        );
        assert!(!world.is_alive(doomed));
        assert_eq!(world.get_component::<Tag>(survivor), Ok(&Tag(9)));
    }
}
