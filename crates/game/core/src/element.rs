//! Elemental tags carried by combatants and tiles.
//!
//! [`ElementType`] is the closed set of elements an action can carry.
//! [`ElementSet`] is the membership set stored on units and tiles: a tag is
//! either present or absent, never counted and never ordered.

use bitflags::bitflags;
use strum::IntoEnumIterator;

/// The five elements understood by the reaction table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    Fire,
    Water,
    Thunder,
    Ice,
    Wood,
}

impl ElementType {
    /// Returns the single-member tag set for this element.
    pub const fn flag(self) -> ElementSet {
        match self {
            ElementType::Fire => ElementSet::FIRE,
            ElementType::Water => ElementSet::WATER,
            ElementType::Thunder => ElementSet::THUNDER,
            ElementType::Ice => ElementSet::ICE,
            ElementType::Wood => ElementSet::WOOD,
        }
    }
}

bitflags! {
    /// Set of elemental tags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ElementSet: u8 {
        const FIRE = 1 << 0;
        const WATER = 1 << 1;
        const THUNDER = 1 << 2;
        const ICE = 1 << 3;
        const WOOD = 1 << 4;
    }
}

impl ElementSet {
    /// Builds a tag set from raw bits.
    ///
    /// # Panics
    ///
    /// Panics if `bits` contains a value outside the closed element enum.
    pub fn from_raw(bits: u8) -> Self {
        match Self::from_bits(bits) {
            Some(set) => set,
            None => panic!("tag bits {bits:#010b} contain an unknown element"),
        }
    }

    /// Returns true if the set carries `element`.
    pub fn has(self, element: ElementType) -> bool {
        self.contains(element.flag())
    }

    /// Adds `element` to the set. Adding an existing tag is a no-op.
    pub fn tag(&mut self, element: ElementType) {
        self.insert(element.flag());
    }

    /// Removes `element` from the set. Removing a missing tag is a no-op.
    pub fn untag(&mut self, element: ElementType) {
        self.remove(element.flag());
    }

    /// Iterates the elements present, in declaration order.
    pub fn elements(self) -> impl Iterator<Item = ElementType> {
        ElementType::iter().filter(move |element| self.has(*element))
    }
}

impl From<ElementType> for ElementSet {
    fn from(element: ElementType) -> Self {
        element.flag()
    }
}

impl FromIterator<ElementType> for ElementSet {
    fn from_iter<I: IntoIterator<Item = ElementType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ElementSet::empty(), |set, element| set | element.flag())
    }
}
