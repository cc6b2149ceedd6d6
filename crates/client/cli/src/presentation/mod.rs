//! Text output for the simulator.
use battle_core::{BattleEvent, BattleObserver, BattlePhase, BattleState, DamageKind};

/// Logs phase changes and the battle result.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl BattleObserver for LogObserver {
    fn on_phase(&mut self, phase: BattlePhase, turn: u32) {
        tracing::info!("[turn {}] {}", turn, phase);
    }

    fn on_victory(&mut self) {
        tracing::info!("All enemies defeated.");
    }

    fn on_defeat(&mut self) {
        tracing::info!("The player has fallen.");
    }
}

/// One-line description of a battle event.
pub fn describe(event: &BattleEvent) -> String {
    match event {
        BattleEvent::TurnStarted { side, turn } => format!("{} turn {} begins", side, turn),
        BattleEvent::TurnEnded { side, turn } => format!("{} turn {} ends", side, turn),
        BattleEvent::DamageTaken {
            target,
            kind,
            report,
        } => {
            let source = match kind {
                DamageKind::Normal => "hit",
                DamageKind::True => "piercing hit",
                DamageKind::Status => "status damage",
            };
            if report.absorbed > 0 {
                format!(
                    "{} takes {} ({}), {} blocked",
                    target, report.health_lost, source, report.absorbed
                )
            } else {
                format!("{} takes {} ({})", target, report.health_lost, source)
            }
        }
        BattleEvent::CombatantDefeated { id } => format!("{} is defeated", id),
        BattleEvent::ActionResolved {
            actor,
            target,
            damage,
        } => format!("{} strikes {} for {}", actor, target, damage),
    }
}

/// Final report printed to stdout.
pub fn summary(name: &str, phase: BattlePhase, turn: u32, state: &BattleState) -> String {
    let mut lines = vec![format!("{}: {} after {} turn(s)", name, phase, turn)];
    for unit in state.combatants() {
        let mut line = format!(
            "  {} {:<6} {:>3}/{:<3}",
            unit.id, unit.side, unit.health.current, unit.health.maximum
        );
        if !unit.tags.is_empty() {
            let tags: Vec<String> = unit.tags.elements().map(|e| e.to_string()).collect();
            line.push_str(&format!(" [{}]", tags.join(", ")));
        }
        if !unit.is_alive() {
            line.push_str(" defeated");
        }
        lines.push(line);
    }
    lines.join("\n")
}
