/// Battle configuration constants and tunable parameters.
///
/// Every reaction magnitude lives here as a named field rather than inline in
/// the rule table, so balance data can be loaded from content files.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Straight-line radius (grid units) collected by the overload chain.
    ///
    /// Measured on raw `(x, y)` coordinates whatever the board's adjacency
    /// offsets, so staggered rows are not shifted half a cell first. The value
    /// is tuned against those raw coordinates.
    pub chain_radius: f32,
    /// Damage percent for amplifying reactions (Fire on Water, Ice on Fire, ...).
    pub amplify_percent: u32,
    /// Damage percent dealt to overload chain victims.
    pub chain_percent: u32,
    /// Burn duration applied by ignition.
    pub burn_turns: u32,
    /// Fixed burn damage dealt per turn-start tick.
    pub burn_damage: u32,
    /// Fixed bleed damage dealt per turn-start tick.
    pub bleed_damage: u32,
    /// Flat bonus added to incoming damage while weakened.
    pub weak_bonus: u32,
    /// Multiplier applied by an armed thunderstrike.
    pub thunderstrike_multiplier: u32,
    /// Flat bonus applied by an armed superconduct.
    pub superconduct_bonus: u32,
    /// Chance (percent) that a boss resists a freeze.
    pub boss_freeze_resist_percent: u32,
    /// Frozen turns applied by a successful freeze.
    pub freeze_turns: u32,
    /// Imprison turns applied to a unit starting its turn on a growth trap.
    pub growth_trap_imprison_turns: u32,
    /// Energy the player regains at the start of each turn.
    pub base_energy: u32,
    /// Cards the player draws at the start of each turn.
    pub base_draw: u32,
    /// Maximum depth of hook-emitted follow-up events.
    pub max_hook_depth: usize,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on tag mutations a single reaction can produce.
    pub const MAX_TAG_MUTATIONS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CHAIN_RADIUS: f32 = 2.3;
    pub const DEFAULT_AMPLIFY_PERCENT: u32 = 150;
    pub const DEFAULT_CHAIN_PERCENT: u32 = 50;
    pub const DEFAULT_BURN_TURNS: u32 = 5;
    pub const DEFAULT_BURN_DAMAGE: u32 = 2;
    pub const DEFAULT_BLEED_DAMAGE: u32 = 2;
    pub const DEFAULT_WEAK_BONUS: u32 = 2;
    pub const DEFAULT_THUNDERSTRIKE_MULTIPLIER: u32 = 2;
    pub const DEFAULT_SUPERCONDUCT_BONUS: u32 = 6;
    pub const DEFAULT_BOSS_FREEZE_RESIST_PERCENT: u32 = 50;
    pub const DEFAULT_FREEZE_TURNS: u32 = 1;
    pub const DEFAULT_GROWTH_TRAP_IMPRISON_TURNS: u32 = 1;
    pub const DEFAULT_BASE_ENERGY: u32 = 3;
    pub const DEFAULT_BASE_DRAW: u32 = 5;
    pub const DEFAULT_MAX_HOOK_DEPTH: usize = 4;

    pub fn new() -> Self {
        Self {
            chain_radius: Self::DEFAULT_CHAIN_RADIUS,
            amplify_percent: Self::DEFAULT_AMPLIFY_PERCENT,
            chain_percent: Self::DEFAULT_CHAIN_PERCENT,
            burn_turns: Self::DEFAULT_BURN_TURNS,
            burn_damage: Self::DEFAULT_BURN_DAMAGE,
            bleed_damage: Self::DEFAULT_BLEED_DAMAGE,
            weak_bonus: Self::DEFAULT_WEAK_BONUS,
            thunderstrike_multiplier: Self::DEFAULT_THUNDERSTRIKE_MULTIPLIER,
            superconduct_bonus: Self::DEFAULT_SUPERCONDUCT_BONUS,
            boss_freeze_resist_percent: Self::DEFAULT_BOSS_FREEZE_RESIST_PERCENT,
            freeze_turns: Self::DEFAULT_FREEZE_TURNS,
            growth_trap_imprison_turns: Self::DEFAULT_GROWTH_TRAP_IMPRISON_TURNS,
            base_energy: Self::DEFAULT_BASE_ENERGY,
            base_draw: Self::DEFAULT_BASE_DRAW,
            max_hook_depth: Self::DEFAULT_MAX_HOOK_DEPTH,
        }
    }

    /// Scales `base` by `percent`, rounding up.
    pub fn scale_up(base: u32, percent: u32) -> u32 {
        base.saturating_mul(percent).div_ceil(100)
    }

    /// Damage dealt by an amplifying reaction.
    pub fn amplified(&self, base: u32) -> u32 {
        Self::scale_up(base, self.amplify_percent)
    }

    /// Damage dealt to each overload chain victim.
    pub fn chained(&self, base: u32) -> u32 {
        Self::scale_up(base, self.chain_percent)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
