//! State management errors.
//!
//! Errors raised while assembling a battle or mutating board occupancy.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, Position};

/// Errors raised by the board graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    /// Two tiles were registered under the same position.
    #[error("tile {0} is defined twice")]
    DuplicateTile(Position),

    /// No tile exists at the given position.
    #[error("tile {0} not found")]
    TileNotFound(Position),

    /// Tile already hosts another combatant.
    #[error("tile {position} is already occupied by {occupant}")]
    TileOccupied {
        position: Position,
        occupant: CombatantId,
    },
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BoardError::DuplicateTile(_) => ErrorSeverity::Fatal,
            BoardError::TileNotFound(_) => ErrorSeverity::Validation,
            BoardError::TileOccupied { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BoardError::DuplicateTile(_) => "BOARD_DUPLICATE_TILE",
            BoardError::TileNotFound(_) => "BOARD_TILE_NOT_FOUND",
            BoardError::TileOccupied { .. } => "BOARD_TILE_OCCUPIED",
        }
    }
}

/// Errors raised while assembling the initial battle state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("board setup failed: {0}")]
    Board(#[from] BoardError),

    #[error("combatant {0} is registered twice")]
    DuplicateCombatant(CombatantId),

    #[error("player must use id {expected}, got {actual}")]
    InvalidPlayerId {
        expected: CombatantId,
        actual: CombatantId,
    },

    #[error("battle needs at least one enemy")]
    NoEnemies,

    #[error("combatant {0} has invalid health")]
    InvalidHealth(CombatantId),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SetupError::Board(error) => error.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SetupError::Board(error) => error.error_code(),
            SetupError::DuplicateCombatant(_) => "SETUP_DUPLICATE_COMBATANT",
            SetupError::InvalidPlayerId { .. } => "SETUP_INVALID_PLAYER_ID",
            SetupError::NoEnemies => "SETUP_NO_ENEMIES",
            SetupError::InvalidHealth(_) => "SETUP_INVALID_HEALTH",
        }
    }
}

/// Errors raised when relocating a combatant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is defeated")]
    Defeated(CombatantId),

    #[error("combatant {id} is imprisoned for {turns} more turn(s)")]
    Imprisoned { id: CombatantId, turns: u32 },

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::UnknownCombatant(_) | MoveError::Defeated(_) => ErrorSeverity::Validation,
            MoveError::Imprisoned { .. } => ErrorSeverity::Recoverable,
            MoveError::Board(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::UnknownCombatant(_) => "MOVE_UNKNOWN_COMBATANT",
            MoveError::Defeated(_) => "MOVE_DEFEATED",
            MoveError::Imprisoned { .. } => "MOVE_IMPRISONED",
            MoveError::Board(error) => error.error_code(),
        }
    }
}
