//! Cinder Engine Core
//!
//! Contains the simulation substrate:
//! - Entity Component System (ECS)
//! - Fixed-step simulation time

pub mod ecs;
pub mod time;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
