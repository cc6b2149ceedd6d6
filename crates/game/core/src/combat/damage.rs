//! Damage calculation and application.

use crate::config::BattleConfig;
use crate::state::Combatant;

// ============================================================================
// Damage Kind
// ============================================================================

/// Which pipeline an incoming hit goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    /// Modifiers, then block, then health.
    #[default]
    Normal,
    /// Modifiers, then health. Block is ignored.
    True,
    /// Block, then health. Modifiers are ignored (burn, bleed, miasma).
    Status,
}

/// Result of one damage instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReport {
    /// Damage after modifiers, before block.
    pub amount: u32,
    /// Portion absorbed by block.
    pub absorbed: u32,
    /// Health actually removed.
    pub health_lost: u32,
    /// True if this instance took the combatant from alive to zero health.
    pub defeated: bool,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Applies a hit through the full pipeline.
///
/// # Formula
///
/// ```text
/// amount = raw + (weak ? weak_bonus : 0)
/// amount = max(amount - melee_damage_reduce, 0)
/// amount = ceil(amount * damage_taken_ratio)
/// block absorbs first, health takes the remainder (floored at 0)
/// ```
///
/// The ratio is resolved to thousandths before scaling, so `1.1` scales by
/// exactly 1100/1000 rather than by its nearest binary fraction.
pub fn apply_damage(target: &mut Combatant, raw: u32, config: &BattleConfig) -> DamageReport {
    let amount = modified_amount(target, raw, config);
    land(target, amount, true)
}

/// Applies a hit with modifiers but without block interaction.
pub fn apply_true_damage(target: &mut Combatant, raw: u32, config: &BattleConfig) -> DamageReport {
    let amount = modified_amount(target, raw, config);
    land(target, amount, false)
}

/// Applies fixed status damage: block then health, no modifiers.
pub fn apply_status_damage(target: &mut Combatant, amount: u32) -> DamageReport {
    land(target, amount, true)
}

/// Dispatches to the entry point matching `kind`.
pub fn apply(
    target: &mut Combatant,
    raw: u32,
    kind: DamageKind,
    config: &BattleConfig,
) -> DamageReport {
    match kind {
        DamageKind::Normal => apply_damage(target, raw, config),
        DamageKind::True => apply_true_damage(target, raw, config),
        DamageKind::Status => apply_status_damage(target, raw),
    }
}

/// Fixed-point denominator for `damage_taken_ratio`.
const RATIO_SCALE: u32 = 1000;

fn modified_amount(target: &Combatant, raw: u32, config: &BattleConfig) -> u32 {
    let ratio = target.damage_taken_ratio;
    assert!(
        ratio.is_finite() && ratio >= 0.0,
        "damage_taken_ratio must be finite and non-negative (got {ratio})"
    );

    let mut amount = raw;
    if target.status.weak > 0 {
        amount = amount.saturating_add(config.weak_bonus);
    }
    amount = amount.saturating_sub(target.melee_damage_reduce);

    let per_mille = (f64::from(ratio) * f64::from(RATIO_SCALE)).round() as u64;
    let scaled = u64::from(amount).saturating_mul(per_mille);
    u32::try_from(scaled.div_ceil(u64::from(RATIO_SCALE))).unwrap_or(u32::MAX)
}

fn land(target: &mut Combatant, amount: u32, use_block: bool) -> DamageReport {
    let was_alive = target.is_alive();

    let absorbed = if use_block {
        let absorbed = amount.min(target.block);
        target.block -= absorbed;
        absorbed
    } else {
        0
    };

    let remainder = amount - absorbed;
    let health_lost = remainder.min(target.health.current);
    target.health.current -= health_lost;

    DamageReport {
        amount,
        absorbed,
        health_lost,
        defeated: was_alive && !target.is_alive(),
    }
}
