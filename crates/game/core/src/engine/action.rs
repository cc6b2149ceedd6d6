//! Player action declarations and their reports.

use crate::element::ElementType;
use crate::state::CombatantId;

use super::BattlePhase;
use super::event::BattleEvent;
use super::resolution::StrikeReport;

/// An action ("card") declared by the player.
///
/// The engine does not know about cards: it only sees the element, the
/// damage, the cost and the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDeclaration {
    pub element: Option<ElementType>,
    pub base_damage: u32,
    /// Energy cost before the turn's cost modifier.
    pub cost: u32,
    pub target: CombatantId,
    /// Block granted to the player before the strike resolves.
    pub block_gain: u32,
    /// Skips the target's block.
    pub true_damage: bool,
}

impl ActionDeclaration {
    pub fn strike(
        target: CombatantId,
        element: Option<ElementType>,
        base_damage: u32,
        cost: u32,
    ) -> Self {
        Self {
            element,
            base_damage,
            cost,
            target,
            block_gain: 0,
            true_damage: false,
        }
    }

    pub fn with_block_gain(mut self, block: u32) -> Self {
        self.block_gain = block;
        self
    }

    pub fn piercing(mut self) -> Self {
        self.true_damage = true;
        self
    }

    /// Returns true if the declaration hits its target at all.
    pub fn strikes(&self) -> bool {
        self.element.is_some() || self.base_damage > 0
    }
}

/// What a successfully declared action did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub energy_spent: u32,
    /// `None` for actions that only grant block.
    pub strike: Option<StrikeReport>,
    /// Every event raised while resolving, hook follow-ups included.
    pub events: Vec<BattleEvent>,
    /// Phase after the terminal check.
    pub phase: BattlePhase,
}

/// What an end of turn (or the battle start) did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub events: Vec<BattleEvent>,
    /// Enemies that skipped their action while frozen or stunned.
    pub skipped: Vec<CombatantId>,
    pub phase: BattlePhase,
    pub turn: u32,
}
