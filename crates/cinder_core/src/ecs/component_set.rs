// component_set.rs - Tuples of component types as signatures
//
// Lets callers write `signature_of::<(Position, Velocity)>()` instead of
// looking up and setting each bit by hand.

use crate::ecs::{Component, ComponentTypeRegistry, EcsError, Signature};

/// A compile-time list of component types, written as a tuple. A single
/// type is the one-element tuple `(T,)`.
pub trait ComponentSet {
    /// Signature with one bit per member. Fails if any member is
    /// unregistered.
    fn signature(registry: &ComponentTypeRegistry) -> Result<Signature, EcsError>;
}

macro_rules! impl_component_set {
    ($($T:ident),+) => {
        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            fn signature(registry: &ComponentTypeRegistry) -> Result<Signature, EcsError> {
                let mut signature = Signature::EMPTY;
                $( signature.set(registry.get::<$T>()?); )+
                Ok(signature)
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
