//! Board provider supplied by the level-setup collaborator.

use crate::state::BoardGraph;

/// Supplies the board graph at battle start.
///
/// Returning `None` runs the battle without a board: direct damage and tag
/// mutation still apply, tile and chain effects are skipped.
pub trait BoardProvider {
    fn board(&self) -> Option<BoardGraph>;
}

/// Provider for battles fought without a board.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBoard;

impl BoardProvider for NoBoard {
    fn board(&self) -> Option<BoardGraph> {
        None
    }
}

impl BoardProvider for BoardGraph {
    fn board(&self) -> Option<BoardGraph> {
        Some(self.clone())
    }
}
