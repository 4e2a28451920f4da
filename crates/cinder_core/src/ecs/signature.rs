//! Fixed-width component bitsets.
//!
//! A [`Signature`] has one bit per possible [`ComponentType`]. Entities use
//! it to record which components they hold; systems use it to declare which
//! components they require.

use crate::ecs::{ComponentType, MAX_COMPONENTS};
use std::fmt;
use std::ops::{BitAnd, BitOr};

const WORDS: usize = (MAX_COMPONENTS + 63) / 64;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    bits: [u64; WORDS],
}

impl Signature {
    pub const EMPTY: Signature = Signature { bits: [0; WORDS] };

    #[inline]
    pub fn set(&mut self, component: ComponentType) {
        let (word, bit) = locate(component);
        self.bits[word] |= 1 << bit;
    }

    #[inline]
    pub fn clear(&mut self, component: ComponentType) {
        let (word, bit) = locate(component);
        self.bits[word] &= !(1 << bit);
    }

    #[inline]
    pub fn has(&self, component: ComponentType) -> bool {
        let (word, bit) = locate(component);
        (self.bits[word] >> bit) & 1 == 1
    }

    /// Builder-style [`Signature::set`].
    pub fn with(mut self, component: ComponentType) -> Self {
        self.set(component);
        self
    }

    /// True when every bit of `required` is also set here, i.e.
    /// `(self & required) == required`.
    #[inline]
    pub fn contains_all(&self, required: &Signature) -> bool {
        self.bits
            .iter()
            .zip(&required.bits)
            .all(|(have, need)| have & need == *need)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Component types whose bit is set, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.bits.iter().enumerate().flat_map(|(word, &bits)| {
            (0..64u32)
                .filter(move |bit| (bits >> bit) & 1 == 1)
                .map(move |bit| ComponentType::new((word * 64) as u8 + bit as u8))
        })
    }
}

#[inline]
fn locate(component: ComponentType) -> (usize, u32) {
    let id = component.index();
    debug_assert!(id < MAX_COMPONENTS, "component type {id} out of range");
    (id / 64, (id % 64) as u32)
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(mut self, rhs: Signature) -> Signature {
        for (a, b) in self.bits.iter_mut().zip(rhs.bits) {
            *a &= b;
        }
        self
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(mut self, rhs: Signature) -> Signature {
        for (a, b) in self.bits.iter_mut().zip(rhs.bits) {
            *a |= b;
        }
        self
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}

/// Bit string, lowest component type on the right.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in (0..MAX_COMPONENTS).rev() {
            let bit = if self.has(ComponentType::new(id as u8)) { '1' } else { '0' };
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.index())).finish()
    }
}
