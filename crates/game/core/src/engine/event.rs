//! Battle events dispatched to hooks and returned to hosts.

use bitflags::bitflags;

use crate::combat::{DamageKind, DamageReport};
use crate::state::{CombatantId, Side};

bitflags! {
    /// Event kinds a hook subscribes to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EventMask: u8 {
        const TURN_STARTED = 1 << 0;
        const TURN_ENDED = 1 << 1;
        const DAMAGE_TAKEN = 1 << 2;
        const COMBATANT_DEFEATED = 1 << 3;
        const ACTION_RESOLVED = 1 << 4;
    }
}

/// Something that happened during resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    TurnStarted {
        side: Side,
        turn: u32,
    },
    TurnEnded {
        side: Side,
        turn: u32,
    },
    /// A damage instance landed, including fully blocked ones.
    DamageTaken {
        target: CombatantId,
        kind: DamageKind,
        report: DamageReport,
    },
    /// Emitted once per combatant, after its tile has been vacated.
    CombatantDefeated {
        id: CombatantId,
    },
    /// A strike finished resolving, chains included.
    ActionResolved {
        actor: CombatantId,
        target: CombatantId,
        damage: u32,
    },
}

impl BattleEvent {
    pub fn kind(&self) -> EventMask {
        match self {
            BattleEvent::TurnStarted { .. } => EventMask::TURN_STARTED,
            BattleEvent::TurnEnded { .. } => EventMask::TURN_ENDED,
            BattleEvent::DamageTaken { .. } => EventMask::DAMAGE_TAKEN,
            BattleEvent::CombatantDefeated { .. } => EventMask::COMBATANT_DEFEATED,
            BattleEvent::ActionResolved { .. } => EventMask::ACTION_RESOLVED,
        }
    }
}
