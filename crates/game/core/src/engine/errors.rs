//! Error types for the turn state machine.

use crate::error::{ErrorSeverity, GameError};
use crate::state::CombatantId;

use super::BattlePhase;

/// Reasons a player action is refused. A rejected action leaves the battle
/// state untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionRejected {
    #[error("actions can only be declared during the player turn (phase is {phase})")]
    WrongPhase { phase: BattlePhase },

    #[error("target {0} not found")]
    TargetNotFound(CombatantId),

    #[error("target {0} is already defeated")]
    TargetDefeated(CombatantId),

    #[error("insufficient energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("battle has not started")]
    BattleNotStarted,

    #[error("battle is over")]
    BattleOver,
}

impl ActionRejected {
    /// Rejection for declaring or ending a turn outside the player turn.
    pub(crate) fn for_phase(phase: BattlePhase) -> Self {
        match phase {
            BattlePhase::Setup => ActionRejected::BattleNotStarted,
            BattlePhase::Victory | BattlePhase::Defeat => ActionRejected::BattleOver,
            phase => ActionRejected::WrongPhase { phase },
        }
    }
}

impl GameError for ActionRejected {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ActionRejected::InsufficientEnergy { .. } => ErrorSeverity::Recoverable,
            ActionRejected::BattleOver => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ActionRejected::WrongPhase { .. } => "ACTION_WRONG_PHASE",
            ActionRejected::TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            ActionRejected::TargetDefeated(_) => "ACTION_TARGET_DEFEATED",
            ActionRejected::InsufficientEnergy { .. } => "ACTION_INSUFFICIENT_ENERGY",
            ActionRejected::BattleNotStarted => "ACTION_BATTLE_NOT_STARTED",
            ActionRejected::BattleOver => "ACTION_BATTLE_OVER",
        }
    }
}

/// Errors raised when driving phase transitions directly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("battle already started (phase is {phase})")]
    AlreadyStarted { phase: BattlePhase },

    #[error("cannot end the turn: {0}")]
    Rejected(#[from] ActionRejected),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::AlreadyStarted { .. } => ErrorSeverity::Validation,
            TurnError::Rejected(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::AlreadyStarted { .. } => "TURN_ALREADY_STARTED",
            TurnError::Rejected(error) => error.error_code(),
        }
    }
}
