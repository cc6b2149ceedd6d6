//! Phase entry and turn-start status ticks.

use std::collections::BTreeSet;

use tracing::{debug, info, trace};

use crate::combat::DamageKind;
use crate::config::BattleConfig;
use crate::element::ElementType;
use crate::state::{BattleState, CombatantId, Side};

use super::enemy::TurnContext;
use super::event::BattleEvent;
use super::resolution::land;
use super::scheduler::SyncBarrier;
use super::{BattleEngine, BattlePhase};

/// Runs one turn-start tick for a living combatant.
///
/// Order: burn, bleed, counter decrements, then the hazards of the occupied
/// tile. Hazards run last so an imprisonment set by a growth trap survives
/// into the turn it was applied for.
pub fn tick_turn_start(
    state: &mut BattleState,
    id: CombatantId,
    config: &BattleConfig,
    events: &mut Vec<BattleEvent>,
) {
    if !state.combatant(id).is_some_and(|unit| unit.is_alive()) {
        return;
    }

    let (burn, bleed) = match state.combatant(id) {
        Some(unit) => (unit.status.burn, unit.status.bleed),
        None => return,
    };

    if burn > 0 {
        land(state, id, config.burn_damage, DamageKind::Status, config, events);
        if let Some(unit) = state.combatant_mut(id) {
            unit.status.burn -= 1;
            if unit.status.burn == 0 {
                unit.tags.untag(ElementType::Fire);
                unit.tags.untag(ElementType::Wood);
                debug!(target: "battle::turn", %id, "burn expired");
            }
        }
    }

    if bleed > 0 {
        land(state, id, config.bleed_damage, DamageKind::Status, config, events);
        if let Some(unit) = state.combatant_mut(id) {
            unit.status.bleed -= 1;
        }
    }

    if let Some(unit) = state.combatant_mut(id) {
        let status = &mut unit.status;
        status.frozen = status.frozen.saturating_sub(1);
        status.stun = status.stun.saturating_sub(1);
        status.weak = status.weak.saturating_sub(1);
        status.imprison = status.imprison.saturating_sub(1);
    }

    let (miasma, trap) = match state.tile_of(id) {
        Some(tile) => (tile.miasma(), tile.has_growth_trap()),
        None => (None, false),
    };
    let alive = state.combatant(id).is_some_and(|unit| unit.is_alive());

    if let (true, Some(damage)) = (alive, miasma) {
        land(state, id, damage, DamageKind::Status, config, events);
    }
    if alive && trap {
        if let Some(unit) = state.combatant_mut(id) {
            unit.status.imprison = unit.status.imprison.max(config.growth_trap_imprison_turns);
            debug!(target: "battle::turn", %id, turns = unit.status.imprison, "caught in growth trap");
        }
    }

    trace!(
        target: "battle::turn",
        %id,
        status = ?state.combatant(id).map(|unit| unit.status),
        "turn-start tick"
    );
}

impl BattleEngine {
    /// `PlayerTurn.Enter`: refill energy, tick everyone, recompute the draw
    /// count and reset the cost modifier.
    pub(super) fn enter_player_turn(&mut self, log: &mut Vec<BattleEvent>) {
        self.turn += 1;
        self.set_phase(BattlePhase::PlayerTurn);

        let resources = &mut self.state.resources;
        resources.energy = self.config.base_energy.saturating_add(resources.energy_bonus);

        let mut events = Vec::new();
        tick_turn_start(&mut self.state, CombatantId::PLAYER, &self.config, &mut events);
        for id in self.state.enemy_ids() {
            tick_turn_start(&mut self.state, id, &self.config, &mut events);
        }

        let resources = &mut self.state.resources;
        let draw = self.config.base_draw as i64 + resources.pending_draw as i64;
        resources.draw_count = draw.clamp(0, u32::MAX as i64) as u32;
        resources.pending_draw = 0;
        resources.cost_modifier = 0;

        info!(
            target: "battle::turn",
            turn = self.turn,
            energy = resources.energy,
            draw = resources.draw_count,
            "player turn started"
        );

        events.push(BattleEvent::TurnStarted {
            side: Side::Player,
            turn: self.turn,
        });
        self.settle(events, log);
        self.check_terminal();
    }

    /// Runs the whole enemy turn. Returns the enemies that skipped their
    /// action.
    pub(super) fn run_enemy_turn(&mut self, log: &mut Vec<BattleEvent>) -> Vec<CombatantId> {
        self.set_phase(BattlePhase::EnemyTurn);
        let mut skipped = Vec::new();

        // Captured before the tick so a one-turn freeze still costs the action.
        let incapacitated: BTreeSet<CombatantId> = self
            .state
            .enemies()
            .iter()
            .filter(|enemy| enemy.is_alive() && enemy.status.is_incapacitated())
            .map(|enemy| enemy.id)
            .collect();

        let mut events = Vec::new();
        for id in self.state.enemy_ids() {
            tick_turn_start(&mut self.state, id, &self.config, &mut events);
        }
        events.push(BattleEvent::TurnStarted {
            side: Side::Enemy,
            turn: self.turn,
        });
        self.settle(events, log);
        if self.check_terminal().is_terminal() {
            return skipped;
        }
        self.scheduler.barrier(SyncBarrier::TurnStartSettled);

        for id in self.state.enemy_ids() {
            if !self.state.combatant(id).is_some_and(|unit| unit.is_alive()) {
                continue;
            }
            if incapacitated.contains(&id) {
                debug!(target: "battle::turn", %id, "incapacitated, skipping action");
                skipped.push(id);
                continue;
            }

            let mut events = Vec::new();
            {
                let mut ctx = TurnContext::new(
                    id,
                    self.turn,
                    &mut self.state,
                    &self.config,
                    self.rng.as_ref(),
                    &mut events,
                );
                match self.behaviors.get_mut(&id) {
                    Some(behavior) => behavior.act(&mut ctx),
                    None => trace!(target: "battle::turn", %id, "no behaviour registered"),
                }
            }
            self.settle(events, log);
            if self.check_terminal().is_terminal() {
                return skipped;
            }
        }
        self.scheduler.barrier(SyncBarrier::ActionsSettled);

        self.state.player_mut().block = 0;
        for enemy in self.state.enemies_mut() {
            if enemy.resets_block {
                enemy.block = 0;
            }
        }

        self.settle(
            vec![BattleEvent::TurnEnded {
                side: Side::Enemy,
                turn: self.turn,
            }],
            log,
        );
        self.check_terminal();
        skipped
    }
}
