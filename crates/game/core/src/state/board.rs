//! Board connectivity over grid coordinates.
//!
//! Adjacency is a fixed-offset relation chosen per row parity so staggered
//! (hex-like) lattices can be described as data. The graph never assumes that
//! adjacency is symmetric: `b` being a neighbour of `a` says nothing about `a`
//! being a neighbour of `b` unless the configured offsets mirror each other.

use std::collections::BTreeMap;

use crate::element::ElementType;

use super::error::BoardError;
use super::{CombatantId, GridOffset, Position, Tile};

/// Neighbour offsets for even and odd rows.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjacencyOffsets {
    pub even_row: Vec<GridOffset>,
    pub odd_row: Vec<GridOffset>,
}

impl AdjacencyOffsets {
    /// Same offsets regardless of row parity.
    pub fn uniform(offsets: Vec<GridOffset>) -> Self {
        Self {
            even_row: offsets.clone(),
            odd_row: offsets,
        }
    }

    /// Orthogonal 4-neighbour square grid.
    pub fn four_way() -> Self {
        Self::uniform(vec![
            GridOffset::new(1, 0),
            GridOffset::new(-1, 0),
            GridOffset::new(0, 1),
            GridOffset::new(0, -1),
        ])
    }

    /// Staggered rows where odd rows are shifted half a cell to the right.
    pub fn odd_row_shifted() -> Self {
        Self {
            even_row: vec![
                GridOffset::new(1, 0),
                GridOffset::new(-1, 0),
                GridOffset::new(-1, 1),
                GridOffset::new(0, 1),
                GridOffset::new(-1, -1),
                GridOffset::new(0, -1),
            ],
            odd_row: vec![
                GridOffset::new(1, 0),
                GridOffset::new(-1, 0),
                GridOffset::new(0, 1),
                GridOffset::new(1, 1),
                GridOffset::new(0, -1),
                GridOffset::new(1, -1),
            ],
        }
    }

    pub fn for_row(&self, y: i32) -> &[GridOffset] {
        if y.rem_euclid(2) == 0 {
            &self.even_row
        } else {
            &self.odd_row
        }
    }
}

impl Default for AdjacencyOffsets {
    fn default() -> Self {
        Self::four_way()
    }
}

/// Mapping from grid position to tile plus the adjacency relation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardGraph {
    tiles: BTreeMap<Position, Tile>,
    offsets: AdjacencyOffsets,
}

impl BoardGraph {
    pub fn new(offsets: AdjacencyOffsets) -> Self {
        Self {
            tiles: BTreeMap::new(),
            offsets,
        }
    }

    /// Builds a `width` x `height` board of untagged tiles.
    pub fn rectangle(width: u32, height: u32, offsets: AdjacencyOffsets) -> Self {
        let tiles = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
            .map(|position| (position, Tile::new(position)))
            .collect();
        Self { tiles, offsets }
    }

    /// Registers a tile. Keys are unique.
    pub fn insert_tile(&mut self, tile: Tile) -> Result<(), BoardError> {
        let position = tile.position();
        if self.tiles.contains_key(&position) {
            return Err(BoardError::DuplicateTile(position));
        }
        self.tiles.insert(position, tile);
        Ok(())
    }

    /// Replaces a tile's non-occupancy state, keeping the current occupant.
    pub fn replace_tile(&mut self, mut tile: Tile) -> Result<(), BoardError> {
        let position = tile.position();
        let existing = self
            .tiles
            .get_mut(&position)
            .ok_or(BoardError::TileNotFound(position))?;
        tile.set_occupant(existing.occupant());
        *existing = tile;
        Ok(())
    }

    pub fn offsets(&self) -> &AdjacencyOffsets {
        &self.offsets
    }

    pub fn contains(&self, position: Position) -> bool {
        self.tiles.contains_key(&position)
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.tiles.get_mut(&position)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Existing tiles reachable in one step from `position`.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        self.offsets
            .for_row(position.y)
            .iter()
            .map(move |offset| position.offset(*offset))
            .filter(|neighbor| self.tiles.contains_key(neighbor))
    }

    pub fn occupant(&self, position: Position) -> Option<CombatantId> {
        self.tiles.get(&position).and_then(Tile::occupant)
    }

    /// Returns true if the tile exists and carries `element`.
    pub fn tile_has(&self, position: Position, element: ElementType) -> bool {
        self.tiles
            .get(&position)
            .is_some_and(|tile| tile.has(element))
    }

    /// Tags the tile at `position`. Missing tiles are ignored.
    pub fn tag_tile(&mut self, position: Position, element: ElementType) -> bool {
        match self.tiles.get_mut(&position) {
            Some(tile) => {
                tile.tags.tag(element);
                true
            }
            None => false,
        }
    }

    /// Places `id` on an empty tile.
    pub fn place(&mut self, id: CombatantId, position: Position) -> Result<(), BoardError> {
        let tile = self
            .tiles
            .get_mut(&position)
            .ok_or(BoardError::TileNotFound(position))?;
        match tile.occupant() {
            Some(occupant) if occupant != id => Err(BoardError::TileOccupied { position, occupant }),
            _ => {
                tile.set_occupant(Some(id));
                Ok(())
            }
        }
    }

    /// Clears the occupant at `position`, returning who was there.
    pub fn vacate(&mut self, position: Position) -> Option<CombatantId> {
        let tile = self.tiles.get_mut(&position)?;
        let previous = tile.occupant();
        tile.set_occupant(None);
        previous
    }

    /// Moves `id` from `from` to `to`, leaving the board untouched on error.
    pub fn relocate(
        &mut self,
        id: CombatantId,
        from: Position,
        to: Position,
    ) -> Result<(), BoardError> {
        if from == to {
            return Ok(());
        }
        self.place(id, to)?;
        if self.occupant(from) == Some(id) {
            self.vacate(from);
        }
        Ok(())
    }
}
