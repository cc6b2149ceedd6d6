use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use battle_core::{
    ActionDeclaration, AdjacencyOffsets, BattleConfig, BattleEngine, BattleEvent, BattleHook,
    BattleState, BoardGraph, Combatant, CombatantId, ElementSet, EnergyOnDefeatHook, EventMask,
    Position, TidalArmorHook,
};

fn two_enemies(board: Option<BoardGraph>) -> BattleState {
    BattleState::new(
        Combatant::player(30, Position::new(0, 0)),
        vec![
            Combatant::enemy(CombatantId(1), 5, Position::new(1, 0)),
            Combatant::enemy(CombatantId(2), 20, Position::new(2, 0)).with_tags(ElementSet::WATER),
        ],
        board,
    )
    .unwrap()
}

fn strike(target: u32, base: u32, cost: u32) -> ActionDeclaration {
    ActionDeclaration::strike(CombatantId(target), None, base, cost)
}

/// Re-emits every turn end it sees.
struct Echo {
    calls: Arc<AtomicUsize>,
}

impl BattleHook for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn interests(&self) -> EventMask {
        EventMask::TURN_ENDED
    }

    fn on_event(
        &self,
        event: &BattleEvent,
        _state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Vec<BattleEvent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec![event.clone()]
    }
}

struct Named {
    name: &'static str,
    priority: i32,
    seen: Arc<Mutex<Vec<&'static str>>>,
}

impl BattleHook for Named {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn interests(&self) -> EventMask {
        EventMask::TURN_STARTED
    }

    fn on_event(
        &self,
        _event: &BattleEvent,
        _state: &mut BattleState,
        _config: &BattleConfig,
    ) -> Vec<BattleEvent> {
        self.seen.lock().unwrap().push(self.name);
        Vec::new()
    }
}

#[test]
fn defeating_an_enemy_refunds_energy_once() {
    let board = BoardGraph::rectangle(3, 1, AdjacencyOffsets::four_way());
    let mut engine = BattleEngine::builder(two_enemies(Some(board)))
        .hook(EnergyOnDefeatHook { amount: 2 })
        .build();
    engine.start().unwrap();

    let report = engine.declare_action(&strike(1, 9, 1)).unwrap();

    assert_eq!(engine.state().resources.energy, 4);
    let defeats = report
        .events
        .iter()
        .filter(|event| matches!(event, BattleEvent::CombatantDefeated { .. }))
        .count();
    assert_eq!(defeats, 1);
    assert_eq!(engine.state().board().unwrap().occupant(Position::new(1, 0)), None);

    // Striking someone else does not announce the fallen enemy again.
    let report = engine.declare_action(&strike(2, 1, 0)).unwrap();
    assert!(!report
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::CombatantDefeated { .. })));
    assert_eq!(engine.state().resources.energy, 4);
}

#[test]
fn tidal_armor_hardens_after_each_hit() {
    let mut engine = BattleEngine::builder(two_enemies(None))
        .hook(TidalArmorHook {
            owner: CombatantId(2),
            block_per_hit: 3,
        })
        .build();
    engine.start().unwrap();

    engine.declare_action(&strike(2, 4, 0)).unwrap();
    let unit = engine.state().combatant(CombatantId(2)).unwrap();
    assert_eq!(unit.health.current, 16);
    assert_eq!(unit.block, 3);

    engine.declare_action(&strike(2, 4, 0)).unwrap();
    let unit = engine.state().combatant(CombatantId(2)).unwrap();
    assert_eq!(unit.health.current, 15);
    assert_eq!(unit.block, 3);

    // Dry units gain nothing.
    engine.declare_action(&strike(1, 1, 0)).unwrap();
    assert_eq!(engine.state().combatant(CombatantId(1)).unwrap().block, 0);
}

#[test]
fn runaway_hook_chains_stop_at_the_depth_limit() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("battle::turn=warn")
        .with_test_writer()
        .try_init();
    let calls = Arc::new(AtomicUsize::new(0));
    let config = BattleConfig {
        max_hook_depth: 4,
        ..BattleConfig::default()
    };
    let mut engine = BattleEngine::builder(two_enemies(None))
        .config(config)
        .hook(Echo {
            calls: calls.clone(),
        })
        .build();
    engine.start().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let report = engine.end_turn().unwrap();

    // One chain per turn end, five dispatch rounds each.
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    let ended = report
        .events
        .iter()
        .filter(|event| matches!(event, BattleEvent::TurnEnded { .. }))
        .count();
    assert_eq!(ended, 12);
    assert_eq!(report.turn, 2);
}

#[test]
fn hooks_run_in_priority_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut engine = BattleEngine::builder(two_enemies(None))
        .hook(Named {
            name: "late",
            priority: 5,
            seen: seen.clone(),
        })
        .hook(Named {
            name: "early",
            priority: -5,
            seen: seen.clone(),
        })
        .build();

    engine.start().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["early", "late"]);
}
