//! Entity Component System core.
//!
//! Entities are ids from a fixed pool, components live in one packed array
//! per type, and every system keeps an eagerly maintained set of the
//! entities whose signature covers its requirements. [`Coordinator`] ties
//! the pieces together and is the only type gameplay code needs.

mod builder;
mod commands;
mod component;
mod component_set;
mod coordinator;
mod entity;
mod error;
mod signature;
mod storage;
mod system;
mod system_handle;
mod system_registry;

pub use builder::EntityBuilder;
pub use commands::CommandBuffer;
pub use component::{Component, ComponentType, ComponentTypeRegistry};
pub use component_set::ComponentSet;
pub use coordinator::Coordinator;
pub use entity::{Entity, EntityRegistry};
pub use error::{EcsError, ErrorKind};
pub use signature::Signature;
pub use storage::{ComponentArray, ErasedStorage};
pub use system::{System, SystemContext};
pub use system_handle::SystemHandle;

/// Size of the entity id pool.
pub const MAX_ENTITIES: usize = 5000;

/// Width of a [`Signature`], and so the most component types one
/// coordinator can register.
pub const MAX_COMPONENTS: usize = 32;

const _: () = assert!(MAX_COMPONENTS <= u8::MAX as usize + 1);
const _: () = assert!(MAX_ENTITIES <= u32::MAX as usize);
