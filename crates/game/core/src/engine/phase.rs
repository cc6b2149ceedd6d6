//! Battle phases.

/// Phase of the turn state machine.
///
/// `Setup` precedes [`BattleEngine::start`](super::BattleEngine::start);
/// terminal checks never fire there. `Victory` and `Defeat` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    Setup,
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }

    /// Returns true once the battle has started and until it ends.
    pub fn is_running(self) -> bool {
        matches!(self, BattlePhase::PlayerTurn | BattlePhase::EnemyTurn)
    }
}
