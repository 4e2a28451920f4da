use crate::ecs::{Component, Coordinator, EcsError, Entity};

type Attach = Box<dyn FnOnce(&mut Coordinator, Entity) -> Result<(), EcsError>>;

/// Collects component values for an entity that does not exist yet.
///
/// Nothing touches the coordinator until [`Coordinator::spawn`] (or a
/// command buffer flush) consumes the builder.
#[derive(Default)]
pub struct EntityBuilder {
    components: Vec<(&'static str, Attach)>,
}

impl EntityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component by value.
    pub fn with<T: Component>(mut self, value: T) -> Self {
        self.components.push((
            T::NAME,
            Box::new(move |world: &mut Coordinator, entity: Entity| {
                world.add_component(entity, value)
            }),
        ));
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Names of the queued components, in insertion order.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|(name, _)| *name)
    }

    pub(crate) fn attach_to(self, world: &mut Coordinator, entity: Entity) -> Result<(), EcsError> {
        for (_, attach) in self.components {
            attach(world, entity)?;
        }
        Ok(())
    }
}

/// Spawn an entity with the given components.
///
/// # Example
/// ```ignore
/// let entity = spawn!(coordinator,
///     Position { x: 0.0, y: 0.0 },
///     Velocity { x: 1.0, y: 1.0 },
/// )?;
/// ```
#[macro_export]
macro_rules! spawn {
    ($world:expr $(, $component:expr)* $(,)?) => {{
        let builder = $crate::ecs::EntityBuilder::new()
            $(.with($component))*;
        $world.spawn(builder)
    }};
}
