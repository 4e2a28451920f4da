use crate::ecs::{Entity, MAX_COMPONENTS, MAX_ENTITIES};
use thiserror::Error;

/// Coarse classification of every [`EcsError`].
///
/// All four kinds are logic errors discovered at the call site. None of them
/// are retryable; the caller decides whether to skip, log, or abort.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CapacityExceeded,
    DuplicateRegistration,
    NotFound,
    InvalidEntity,
}

/// Errors reported by the entity registry, component storage, and the
/// coordinator facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EcsError {
    #[error("entity pool exhausted: all {capacity} entity ids are in use")]
    EntityCapacityExceeded { capacity: usize },

    #[error("cannot register component '{name}': all {} component type slots are in use", MAX_COMPONENTS)]
    ComponentCapacityExceeded { name: &'static str },

    #[error("entity capacity {requested} is outside 1..={}", MAX_ENTITIES)]
    InvalidEntityCapacity { requested: usize },

    #[error("component '{name}' is already registered")]
    DuplicateComponent { name: &'static str },

    #[error("system '{name}' is already registered")]
    DuplicateSystem { name: &'static str },

    #[error("component '{name}' has not been registered")]
    ComponentNotRegistered { name: &'static str },

    #[error("system '{name}' has not been registered")]
    SystemNotRegistered { name: &'static str },

    #[error("entity {entity} has no '{name}' component")]
    ComponentNotFound { entity: Entity, name: &'static str },

    #[error("entity {entity} is not alive")]
    InvalidEntity { entity: Entity },

    #[error("system '{name}' is already running")]
    SystemBusy { name: &'static str },
}

impl EcsError {
    /// Map this error onto the four-way taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EntityCapacityExceeded { .. }
            | Self::ComponentCapacityExceeded { .. }
            | Self::InvalidEntityCapacity { .. } => ErrorKind::CapacityExceeded,
            Self::DuplicateComponent { .. } | Self::DuplicateSystem { .. } => {
                ErrorKind::DuplicateRegistration
            }
            Self::ComponentNotRegistered { .. }
            | Self::SystemNotRegistered { .. }
            | Self::ComponentNotFound { .. }
            | Self::SystemBusy { .. } => ErrorKind::NotFound,
            Self::InvalidEntity { .. } => ErrorKind::InvalidEntity,
        }
    }
}
