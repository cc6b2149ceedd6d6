//! Damage resolution for combatants.
//!
//! Pure functions over a single [`Combatant`](crate::state::Combatant); they
//! never look at the board or at other units. Reactions decide *how much*
//! damage lands, this module decides *where* it lands (block, then health).
//!
//! # Entry points
//!
//! - `apply_damage`: weak bonus, flat reduction, ratio, then block and health
//! - `apply_true_damage`: same modifiers, bypasses block
//! - `apply_status_damage`: no modifiers, block then health

pub mod damage;

pub use damage::{
    DamageKind, DamageReport, apply, apply_damage, apply_status_damage, apply_true_damage,
};
