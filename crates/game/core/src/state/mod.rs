//! Authoritative battle state representation.
//!
//! This module owns the combatant registry, the optional board graph and the
//! player's per-turn resources. Hosts read this state freely but mutate it
//! through the engine; the board is the only structure shared by every
//! combatant.
pub mod board;
pub mod error;
pub mod types;

pub use board::{AdjacencyOffsets, BoardGraph};
pub use error::{BoardError, MoveError, SetupError};
pub use types::{
    ArmedFlags, Combatant, CombatantId, GridOffset, Position, ResourceMeter, Side,
    StatusCounters, Tile, UnitClass,
};

use std::collections::BTreeSet;

use crate::env::BoardProvider;

/// Player-only turn economy.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerResources {
    /// Energy left this turn.
    pub energy: u32,
    /// Extra energy granted on every refill.
    pub energy_bonus: u32,
    /// Cards to draw this turn, recomputed on turn start.
    pub draw_count: u32,
    /// Accumulated draw modifier applied to the next turn start, then reset.
    pub pending_draw: i32,
    /// Added to every action cost this turn, reset on turn boundaries.
    pub cost_modifier: i32,
}

impl PlayerResources {
    /// Effective energy cost of an action under the current modifier.
    pub fn effective_cost(&self, cost: u32) -> u32 {
        (cost as i64 + self.cost_modifier as i64).max(0) as u32
    }
}

/// Canonical snapshot of a battle in progress.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// RNG seed for deterministic rolls. Set once at battle start.
    pub seed: u64,
    /// Resolution counter mixed into every roll seed.
    pub nonce: u64,

    player: Combatant,
    /// Enemies in action order. The order is significant and stable.
    enemies: Vec<Combatant>,
    /// `None` means no board was supplied; tile and chain effects are skipped.
    board: Option<BoardGraph>,

    pub resources: PlayerResources,
}

impl BattleState {
    /// Assembles a battle, validating identifiers and placing every combatant
    /// on the board when one is supplied.
    pub fn new(
        player: Combatant,
        enemies: Vec<Combatant>,
        board: Option<BoardGraph>,
    ) -> Result<Self, SetupError> {
        if player.id != CombatantId::PLAYER {
            return Err(SetupError::InvalidPlayerId {
                expected: CombatantId::PLAYER,
                actual: player.id,
            });
        }
        if enemies.is_empty() {
            return Err(SetupError::NoEnemies);
        }

        let mut seen = BTreeSet::new();
        for unit in std::iter::once(&player).chain(enemies.iter()) {
            if !seen.insert(unit.id) {
                return Err(SetupError::DuplicateCombatant(unit.id));
            }
            if unit.health.maximum == 0 || unit.health.current > unit.health.maximum {
                return Err(SetupError::InvalidHealth(unit.id));
            }
        }

        let mut board = board;
        if let Some(board) = board.as_mut() {
            for unit in std::iter::once(&player).chain(enemies.iter()) {
                if unit.is_alive() {
                    board.place(unit.id, unit.position)?;
                }
            }
        }

        Ok(Self {
            seed: 0,
            nonce: 0,
            player,
            enemies,
            board,
            resources: PlayerResources::default(),
        })
    }

    /// Assembles a battle on the board handed over by `provider`.
    pub fn from_provider(
        player: Combatant,
        enemies: Vec<Combatant>,
        provider: &dyn BoardProvider,
    ) -> Result<Self, SetupError> {
        Self::new(player, enemies, provider.board())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Combatant {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.enemies
    }

    pub(crate) fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.enemies.iter_mut()
    }

    /// Enemy identifiers in action order.
    pub fn enemy_ids(&self) -> Vec<CombatantId> {
        self.enemies.iter().map(|enemy| enemy.id).collect()
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        if id.is_player() {
            Some(&self.player)
        } else {
            self.enemies.iter().find(|enemy| enemy.id == id)
        }
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        if id.is_player() {
            Some(&mut self.player)
        } else {
            self.enemies.iter_mut().find(|enemy| enemy.id == id)
        }
    }

    /// Player followed by enemies in action order.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        std::iter::once(&self.player).chain(self.enemies.iter())
    }

    pub fn board(&self) -> Option<&BoardGraph> {
        self.board.as_ref()
    }

    pub fn board_mut(&mut self) -> Option<&mut BoardGraph> {
        self.board.as_mut()
    }

    /// Combatant standing on `position`, if it is still alive.
    pub fn occupant_at(&self, position: Position) -> Option<&Combatant> {
        let id = self.board.as_ref()?.occupant(position)?;
        self.combatant(id).filter(|unit| unit.is_alive())
    }

    /// Tile under a combatant, if a board is present.
    pub fn tile_of(&self, id: CombatantId) -> Option<&Tile> {
        let position = self.combatant(id)?.position;
        self.board.as_ref()?.tile(position)
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.is_alive())
    }

    pub fn player_defeated(&self) -> bool {
        !self.player.is_alive()
    }

    /// Moves a living combatant, keeping board occupancy in sync.
    ///
    /// Without a board only the combatant's position changes.
    pub fn move_combatant(&mut self, id: CombatantId, to: Position) -> Result<(), MoveError> {
        let unit = self.combatant(id).ok_or(MoveError::UnknownCombatant(id))?;
        if !unit.is_alive() {
            return Err(MoveError::Defeated(id));
        }
        if unit.status.imprison > 0 {
            return Err(MoveError::Imprisoned {
                id,
                turns: unit.status.imprison,
            });
        }
        let from = unit.position;

        if let Some(board) = self.board.as_mut() {
            board.relocate(id, from, to)?;
        }
        if let Some(unit) = self.combatant_mut(id) {
            unit.position = to;
        }
        Ok(())
    }

    /// Removes a defeated combatant from the board. Returns true if a tile
    /// was vacated.
    pub(crate) fn vacate(&mut self, id: CombatantId) -> bool {
        let Some(position) = self.combatant(id).map(|unit| unit.position) else {
            return false;
        };
        match self.board.as_mut() {
            Some(board) if board.occupant(position) == Some(id) => {
                board.vacate(position);
                true
            }
            _ => false,
        }
    }
}
