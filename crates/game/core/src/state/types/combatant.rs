//! Shared unit state for the player and every enemy.
//!
//! A combatant owns its tag set and status counters exclusively. Only the
//! reaction pipeline and the turn-start tick mutate them.

use bitflags::bitflags;

use crate::element::ElementSet;

use super::{CombatantId, Position, ResourceMeter};

/// Which side of the battle a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

/// Resistance class. Bosses may resist freezing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitClass {
    #[default]
    Normal,
    Boss,
}

bitflags! {
    /// One-shot multipliers consumed by the next damage instance.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ArmedFlags: u8 {
        /// Doubles the next damage instance.
        const THUNDERSTRIKE = 1 << 0;
        /// Adds a flat bonus to the next damage instance.
        const SUPERCONDUCT = 1 << 1;
    }
}

/// Turn counters for timed status effects. All decrement over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCounters {
    pub burn: u32,
    pub frozen: u32,
    pub stun: u32,
    pub weak: u32,
    pub bleed: u32,
    pub imprison: u32,
}

impl StatusCounters {
    /// Returns true if the unit cannot take its action this turn.
    pub fn is_incapacitated(&self) -> bool {
        self.frozen > 0 || self.stun > 0
    }
}

/// A unit on the board.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub side: Side,
    pub class: UnitClass,
    pub position: Position,

    pub health: ResourceMeter,
    /// Absorbs damage before health.
    pub block: u32,
    /// Flat reduction applied to incoming hits before the ratio.
    pub melee_damage_reduce: u32,
    /// Multiplier applied to incoming hits, rounded up.
    pub damage_taken_ratio: f32,
    /// Whether block is zeroed at the end of every enemy turn.
    pub resets_block: bool,

    pub tags: ElementSet,
    pub status: StatusCounters,
    pub armed: ArmedFlags,
}

impl Combatant {
    /// Creates a combatant at full health with no tags or statuses.
    pub fn new(id: CombatantId, side: Side, max_health: u32, position: Position) -> Self {
        Self {
            id,
            side,
            class: UnitClass::Normal,
            position,
            health: ResourceMeter::full(max_health),
            block: 0,
            melee_damage_reduce: 0,
            damage_taken_ratio: 1.0,
            resets_block: true,
            tags: ElementSet::empty(),
            status: StatusCounters::default(),
            armed: ArmedFlags::empty(),
        }
    }

    pub fn player(max_health: u32, position: Position) -> Self {
        Self::new(CombatantId::PLAYER, Side::Player, max_health, position)
    }

    pub fn enemy(id: CombatantId, max_health: u32, position: Position) -> Self {
        debug_assert!(!id.is_player(), "enemy cannot use the player id");
        Self::new(id, Side::Enemy, max_health, position)
    }

    pub fn with_class(mut self, class: UnitClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_tags(mut self, tags: ElementSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_block(mut self, block: u32) -> Self {
        self.block = block;
        self
    }

    pub fn with_damage_taken_ratio(mut self, ratio: f32) -> Self {
        self.damage_taken_ratio = ratio;
        self
    }

    pub fn with_melee_damage_reduce(mut self, reduce: u32) -> Self {
        self.melee_damage_reduce = reduce;
        self
    }

    pub fn with_resets_block(mut self, resets_block: bool) -> Self {
        self.resets_block = resets_block;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn is_boss(&self) -> bool {
        self.class == UnitClass::Boss
    }

    pub fn is_enemy(&self) -> bool {
        self.side == Side::Enemy
    }
}
