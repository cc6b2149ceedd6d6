use crate::element::{ElementSet, ElementType};

use super::{CombatantId, Position};

/// Per-cell board state.
///
/// The position is the tile's key in the board graph and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    position: Position,
    pub tags: ElementSet,
    pub miasma_active: bool,
    pub miasma_damage: u32,
    occupant: Option<CombatantId>,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            tags: ElementSet::empty(),
            miasma_active: false,
            miasma_damage: 0,
            occupant: None,
        }
    }

    pub fn with_tags(mut self, tags: ElementSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_miasma(mut self, damage: u32) -> Self {
        self.miasma_active = true;
        self.miasma_damage = damage;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn occupant(&self) -> Option<CombatantId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn has(&self, element: ElementType) -> bool {
        self.tags.has(element)
    }

    /// A tile holding both Water and Wood grows a trap.
    pub fn has_growth_trap(&self) -> bool {
        self.tags.contains(ElementSet::WATER | ElementSet::WOOD)
    }

    /// Miasma damage dealt to an occupant at turn start, if any.
    pub fn miasma(&self) -> Option<u32> {
        self.miasma_active.then_some(self.miasma_damage)
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<CombatantId>) {
        self.occupant = occupant;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_trap_requires_water_and_wood() {
        let mut tile = Tile::new(Position::ORIGIN).with_tags(ElementSet::WATER);
        assert!(!tile.has_growth_trap());

        tile.tags.tag(ElementType::Wood);
        assert!(tile.has_growth_trap());

        tile.tags.untag(ElementType::Water);
        assert!(!tile.has_growth_trap());
    }

    #[test]
    fn miasma_reports_damage_only_when_active() {
        let tile = Tile::new(Position::ORIGIN);
        assert_eq!(tile.miasma(), None);
        assert_eq!(tile.with_miasma(3).miasma(), Some(3));
    }
}
