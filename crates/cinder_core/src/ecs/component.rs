// component.rs - Component types and their dense ids
//
// Each Rust component type is mapped to a small integer in registration
// order. That integer is the bit position used in every Signature.

use crate::ecs::{EcsError, MAX_COMPONENTS};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Trait for plain data records attached to entities.
pub trait Component: 'static + Sized {
    /// Human-readable name for errors and logs.
    const NAME: &'static str;
}

/// Helper macro to implement the Component trait.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Copy)]
/// struct Position { x: f32, y: f32 }
///
/// define_component!(Position);
/// define_component!(Velocity, "velocity");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty) => {
        $crate::define_component!($ty, stringify!($ty));
    };
    ($ty:ty, $name:expr) => {
        impl $crate::ecs::Component for $ty {
            const NAME: &'static str = $name;
        }
    };
}

/// Dense id of a registered component type, in `0..MAX_COMPONENTS`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentType(u8);

impl ComponentType {
    pub(crate) const fn new(id: u8) -> Self {
        Self(id)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assigns ids to component types.
///
/// Keys are `TypeId`s, so two distinct types never collide even when their
/// names match.
#[derive(Default)]
pub struct ComponentTypeRegistry {
    ids: HashMap<TypeId, ComponentType>,
    names: Vec<&'static str>,
}

impl ComponentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next sequential id to `T`.
    ///
    /// A second registration of the same type is rejected and the first id
    /// stays in place.
    pub fn register<T: Component>(&mut self) -> Result<ComponentType, EcsError> {
        let key = TypeId::of::<T>();
        if self.ids.contains_key(&key) {
            return Err(EcsError::DuplicateComponent { name: T::NAME });
        }
        if self.names.len() >= MAX_COMPONENTS {
            return Err(EcsError::ComponentCapacityExceeded { name: T::NAME });
        }

        let id = ComponentType::new(self.names.len() as u8);
        self.ids.insert(key, id);
        self.names.push(T::NAME);
        debug!(component = T::NAME, %id, "component type registered");
        Ok(id)
    }

    pub fn get<T: Component>(&self) -> Result<ComponentType, EcsError> {
        self.ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::ComponentNotRegistered { name: T::NAME })
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.ids.contains_key(&TypeId::of::<T>())
    }

    /// Name recorded for a registered id.
    pub fn name_of(&self, id: ComponentType) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    define_component!(Position);

    struct Velocity;
    define_component!(Velocity, "velocity");

    #[test]
    fn ids_follow_registration_order() {
        let mut registry = ComponentTypeRegistry::new();
        assert_eq!(registry.register::<Velocity>().unwrap().index(), 0);
        assert_eq!(registry.register::<Position>().unwrap().index(), 1);
        assert_eq!(registry.get::<Position>().unwrap().index(), 1);
        assert_eq!(registry.name_of(ComponentType::new(0)), Some("velocity"));
    }

    #[test]
    fn duplicate_registration_keeps_first_id() {
        let mut registry = ComponentTypeRegistry::new();
        let first = registry.register::<Position>().unwrap();
        assert_eq!(
            registry.register::<Position>(),
            Err(EcsError::DuplicateComponent { name: "Position" })
        );
        assert_eq!(registry.get::<Position>().unwrap(), first);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_lookup_fails() {
        let registry = ComponentTypeRegistry::new();
        assert_eq!(
            registry.get::<Position>(),
            Err(EcsError::ComponentNotRegistered { name: "Position" })
        );
        assert!(!registry.is_registered::<Position>());
    }

    #[test]
    fn registry_is_bounded() {
        struct Marker<const N: usize>;
        impl<const N: usize> Component for Marker<N> {
            const NAME: &'static str = "Marker";
        }

        macro_rules! register_all {
            ($registry:expr, $($n:literal)*) => {
                $( $registry.register::<Marker<$n>>().unwrap(); )*
            };
        }

        let mut registry = ComponentTypeRegistry::new();
        register_all!(registry,
            0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        assert_eq!(registry.len(), MAX_COMPONENTS);
        assert_eq!(
            registry.register::<Marker<32>>(),
            Err(EcsError::ComponentCapacityExceeded { name: "Marker" })
        );
    }
}
