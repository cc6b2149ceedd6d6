//! Enemy turn callbacks.
//!
//! The engine treats each enemy's behaviour as opaque: it calls
//! [`EnemyBehavior::act`] once per enemy turn, in list order, skipping dead
//! and incapacitated units. Behaviours act through [`TurnContext`], which
//! routes strikes through the same reaction and damage pipeline the player
//! uses. Bespoke behaviours can also land raw damage or edit tags directly.

use tracing::debug;

use crate::combat::{DamageKind, DamageReport};
use crate::config::BattleConfig;
use crate::element::ElementType;
use crate::env::RngOracle;
use crate::reaction::Strike;
use crate::state::{BattleState, Combatant, CombatantId, MoveError, Position};

use super::event::BattleEvent;
use super::resolution::{StrikeReport, execute_strike, land};

/// Turn behaviour supplied by the AI collaborator.
pub trait EnemyBehavior {
    fn act(&mut self, ctx: &mut TurnContext<'_>);
}

/// Behaviour that does nothing. Used for enemies without a registered one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passive;

impl EnemyBehavior for Passive {
    fn act(&mut self, _ctx: &mut TurnContext<'_>) {}
}

impl<F> EnemyBehavior for F
where
    F: FnMut(&mut TurnContext<'_>),
{
    fn act(&mut self, ctx: &mut TurnContext<'_>) {
        self(ctx)
    }
}

/// View of the battle handed to an acting enemy.
pub struct TurnContext<'a> {
    actor: CombatantId,
    turn: u32,
    state: &'a mut BattleState,
    config: &'a BattleConfig,
    rng: &'a dyn RngOracle,
    events: &'a mut Vec<BattleEvent>,
}

impl<'a> TurnContext<'a> {
    pub(crate) fn new(
        actor: CombatantId,
        turn: u32,
        state: &'a mut BattleState,
        config: &'a BattleConfig,
        rng: &'a dyn RngOracle,
        events: &'a mut Vec<BattleEvent>,
    ) -> Self {
        Self {
            actor,
            turn,
            state,
            config,
            rng,
            events,
        }
    }

    pub fn actor_id(&self) -> CombatantId {
        self.actor
    }

    /// The acting enemy.
    pub fn actor(&self) -> Option<&Combatant> {
        self.state.combatant(self.actor)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn config(&self) -> &BattleConfig {
        self.config
    }

    /// Strikes `target` through the reaction table.
    ///
    /// Returns `None` if the target is missing or already defeated.
    pub fn strike(
        &mut self,
        target: CombatantId,
        element: Option<ElementType>,
        base_damage: u32,
    ) -> Option<StrikeReport> {
        if !self.state.combatant(target)?.is_alive() {
            return None;
        }
        let strike = Strike {
            attacker: self.actor,
            defender: target,
            element,
            base_damage,
        };
        debug!(
            target: "battle::turn",
            actor = %self.actor,
            defender = %target,
            ?element,
            base_damage,
            "enemy strike"
        );
        Some(execute_strike(
            &strike,
            DamageKind::Normal,
            self.state,
            self.config,
            self.rng,
            self.events,
        ))
    }

    /// Strikes the player.
    pub fn strike_player(
        &mut self,
        element: Option<ElementType>,
        base_damage: u32,
    ) -> Option<StrikeReport> {
        self.strike(CombatantId::PLAYER, element, base_damage)
    }

    /// Lands `raw` damage on `target` through the pipeline matching `kind`.
    ///
    /// No reaction is resolved and armed flags are left alone. Returns `None`
    /// if the target is missing or already defeated.
    pub fn apply_damage(
        &mut self,
        target: CombatantId,
        raw: u32,
        kind: DamageKind,
    ) -> Option<DamageReport> {
        if !self.state.combatant(target)?.is_alive() {
            return None;
        }
        debug!(target: "battle::turn", actor = %self.actor, unit = %target, raw, ?kind, "enemy direct damage");
        land(self.state, target, raw, kind, self.config, self.events)
    }

    /// Adds `element` to `target`'s tags. Returns false if the target is
    /// missing.
    pub fn tag(&mut self, target: CombatantId, element: ElementType) -> bool {
        match self.state.combatant_mut(target) {
            Some(unit) => {
                unit.tags.tag(element);
                true
            }
            None => false,
        }
    }

    /// Removes `element` from `target`'s tags. Returns false if the target is
    /// missing.
    pub fn untag(&mut self, target: CombatantId, element: ElementType) -> bool {
        match self.state.combatant_mut(target) {
            Some(unit) => {
                unit.tags.untag(element);
                true
            }
            None => false,
        }
    }

    /// Adds block to the acting enemy.
    pub fn guard(&mut self, amount: u32) {
        if let Some(unit) = self.state.combatant_mut(self.actor) {
            unit.block = unit.block.saturating_add(amount);
            debug!(target: "battle::turn", actor = %self.actor, amount, block = unit.block, "enemy guard");
        }
    }

    /// Moves the acting enemy, keeping board occupancy in sync.
    pub fn move_to(&mut self, to: Position) -> Result<(), MoveError> {
        self.state.move_combatant(self.actor, to)
    }
}
