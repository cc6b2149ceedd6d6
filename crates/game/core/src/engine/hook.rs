//! Event hooks that apply additional state changes after resolution.
//!
//! Hooks subscribe to event kinds through [`BattleHook::interests`] and are
//! dispatched by kind, in priority order (lower values first). A hook may
//! return follow-up events; the engine dispatches those one level deeper, up
//! to `BattleConfig::max_hook_depth`.

use std::sync::Arc;

use tracing::trace;

use crate::config::BattleConfig;
use crate::element::ElementType;
use crate::state::{BattleState, CombatantId};

use super::event::{BattleEvent, EventMask};

/// A reaction to battle events, owned by a relic, unit trait or card.
pub trait BattleHook: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the priority of this hook. Lower values execute first.
    /// Default priority is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Event kinds this hook wants to see.
    fn interests(&self) -> EventMask;

    /// Applies the hook's effects and returns follow-up events.
    fn on_event(
        &self,
        event: &BattleEvent,
        state: &mut BattleState,
        config: &BattleConfig,
    ) -> Vec<BattleEvent>;
}

/// Hooks sorted by priority.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn BattleHook>>,
}

impl HookRegistry {
    pub fn new(mut hooks: Vec<Arc<dyn BattleHook>>) -> Self {
        // Stable sort keeps registration order among equal priorities.
        hooks.sort_by_key(|hook| hook.priority());
        Self { hooks }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every interested hook on `event` and gathers their follow-ups.
    pub fn dispatch(
        &self,
        event: &BattleEvent,
        state: &mut BattleState,
        config: &BattleConfig,
    ) -> Vec<BattleEvent> {
        let kind = event.kind();
        let mut follow_ups = Vec::new();
        for hook in self.hooks.iter().filter(|hook| hook.interests().intersects(kind)) {
            trace!(target: "battle::turn", hook = hook.name(), ?kind, "dispatching hook");
            follow_ups.extend(hook.on_event(event, state, config));
        }
        follow_ups
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}

/// Water armour: the owner gains block each time it is hit while carrying
/// the Water tag.
#[derive(Clone, Copy, Debug)]
pub struct TidalArmorHook {
    pub owner: CombatantId,
    pub block_per_hit: u32,
}

impl BattleHook for TidalArmorHook {
    fn name(&self) -> &'static str {
        "tidal_armor"
    }

    fn interests(&self) -> EventMask {
        EventMask::DAMAGE_TAKEN
    }

    fn on_event(
        &self,
        event: &BattleEvent,
        state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Vec<BattleEvent> {
        let BattleEvent::DamageTaken { target, .. } = event else {
            return Vec::new();
        };
        if *target != self.owner {
            return Vec::new();
        }
        if let Some(unit) = state.combatant_mut(self.owner) {
            if unit.is_alive() && unit.tags.has(ElementType::Water) {
                unit.block = unit.block.saturating_add(self.block_per_hit);
            }
        }
        Vec::new()
    }
}

/// The player regains energy whenever an enemy falls.
#[derive(Clone, Copy, Debug)]
pub struct EnergyOnDefeatHook {
    pub amount: u32,
}

impl BattleHook for EnergyOnDefeatHook {
    fn name(&self) -> &'static str {
        "energy_on_defeat"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn interests(&self) -> EventMask {
        EventMask::COMBATANT_DEFEATED
    }

    fn on_event(
        &self,
        event: &BattleEvent,
        state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Vec<BattleEvent> {
        if let BattleEvent::CombatantDefeated { id } = event {
            if !id.is_player() {
                state.resources.energy = state.resources.energy.saturating_add(self.amount);
            }
        }
        Vec::new()
    }
}
