//! Applies a reaction outcome to the battle.
//!
//! Every strike, whether declared by the player or issued from an enemy's
//! behaviour, goes through [`execute_strike`]: resolve the reaction, mutate
//! the defender's tags and status, tag tiles, land the primary hit, then land
//! every chain hit. Chains always run to completion once resolved.
//!
//! A chain hit is a damage instance for its victim, so it spends the victim's
//! armed flags just as a primary hit spends the defender's.

use tracing::debug;

use crate::combat::{self, DamageKind, DamageReport};
use crate::config::BattleConfig;
use crate::env::RngOracle;
use crate::reaction::{self, ReactionOutcome, StatusApplied, Strike, TagMutation};
use crate::state::{ArmedFlags, BattleState, Combatant, CombatantId};

use super::event::BattleEvent;

/// Result of one strike, chains included.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeReport {
    pub outcome: ReactionOutcome,
    /// `None` when the strike carried no damage after reactions.
    pub primary: Option<DamageReport>,
    /// Hits landed on chain victims, in chain order.
    pub chain: Vec<(CombatantId, DamageReport)>,
}

impl StrikeReport {
    /// Health removed across the primary hit and every chain hit.
    pub fn total_health_lost(&self) -> u32 {
        self.primary.map_or(0, |report| report.health_lost)
            + self
                .chain
                .iter()
                .map(|(_, report)| report.health_lost)
                .sum::<u32>()
    }
}

pub(crate) fn execute_strike(
    strike: &Strike,
    kind: DamageKind,
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
    events: &mut Vec<BattleEvent>,
) -> StrikeReport {
    let outcome = reaction::resolve(strike, state, config, rng);
    state.nonce += 1;

    if let Some(defender) = state.combatant_mut(strike.defender) {
        apply_to_defender(defender, &outcome);
    }

    if let Some(spread) = &outcome.tile_spread {
        if let Some(board) = state.board_mut() {
            for position in &spread.tiles {
                board.tag_tile(*position, spread.tag);
            }
        }
    }

    let primary = if outcome.final_damage > 0 {
        land(state, strike.defender, outcome.final_damage, kind, config, events)
    } else {
        None
    };

    let mut chain = Vec::new();
    if let Some(spec) = &outcome.chain {
        for target in &spec.targets {
            let Some(victim) = state.combatant_mut(*target) else {
                continue;
            };
            if !victim.is_alive() {
                continue;
            }
            if let Some(tag) = spec.tag {
                victim.tags.tag(tag);
            }
            if spec.damage == 0 {
                continue;
            }
            let armed = std::mem::take(&mut victim.armed);
            let damage = reaction::armed_damage(spec.damage, armed, config);
            if !armed.is_empty() {
                debug!(
                    target: "battle::chain",
                    victim = %target,
                    ?armed,
                    base = spec.damage,
                    damage,
                    "chain hit spent armed flags"
                );
            }
            if let Some(report) = land(state, *target, damage, DamageKind::Normal, config, events)
            {
                chain.push((*target, report));
            }
        }
    }

    events.push(BattleEvent::ActionResolved {
        actor: strike.attacker,
        target: strike.defender,
        damage: primary.map_or(0, |report| report.amount),
    });

    StrikeReport {
        outcome,
        primary,
        chain,
    }
}

fn apply_to_defender(defender: &mut Combatant, outcome: &ReactionOutcome) {
    defender.armed.remove(outcome.consumed);

    for mutation in &outcome.tag_mutations {
        match mutation {
            TagMutation::Add(element) => defender.tags.tag(*element),
            TagMutation::Remove(element) => defender.tags.untag(*element),
        }
    }

    match outcome.status_applied {
        Some(StatusApplied::Burn { turns }) => defender.status.burn = turns,
        Some(StatusApplied::Freeze { turns }) => {
            defender.status.frozen = defender.status.frozen.max(turns);
        }
        Some(StatusApplied::Thunderstrike) => defender.armed.insert(ArmedFlags::THUNDERSTRIKE),
        Some(StatusApplied::Superconduct) => defender.armed.insert(ArmedFlags::SUPERCONDUCT),
        Some(StatusApplied::FreezeResisted) | None => {}
    }
}

/// Lands one hit through the pipeline matching `kind` and records it.
pub(crate) fn land(
    state: &mut BattleState,
    target: CombatantId,
    raw: u32,
    kind: DamageKind,
    config: &BattleConfig,
    events: &mut Vec<BattleEvent>,
) -> Option<DamageReport> {
    let unit = state.combatant_mut(target)?;
    let report = combat::apply(unit, raw, kind, config);

    debug!(
        target: "battle::damage",
        unit = %target,
        raw,
        ?kind,
        amount = report.amount,
        absorbed = report.absorbed,
        health_lost = report.health_lost,
        health = unit.health.current,
        "damage landed"
    );

    events.push(BattleEvent::DamageTaken {
        target,
        kind,
        report,
    });
    Some(report)
}
