use battle_core::{
    ActionDeclaration, AdjacencyOffsets, ArmedFlags, BattleConfig, BattleEngine, BattleState, BoardGraph,
    Combatant, CombatantId, ElementSet, ElementType, Position, Reaction, Tile,
};

fn wet(board: &mut BoardGraph, positions: &[(i32, i32)]) {
    for &(x, y) in positions {
        board
            .replace_tile(Tile::new(Position::new(x, y)).with_tags(ElementSet::WATER))
            .unwrap();
    }
}

fn started(state: BattleState) -> BattleEngine {
    let mut engine = BattleEngine::new(state, BattleConfig::default());
    engine.start().unwrap();
    engine
}

fn thunder(target: u32, base: u32) -> ActionDeclaration {
    ActionDeclaration::strike(CombatantId(target), Some(ElementType::Thunder), base, 0)
}

fn health(engine: &BattleEngine, id: u32) -> u32 {
    engine.state().combatant(CombatantId(id)).unwrap().health.current
}

#[test]
fn current_runs_around_a_water_ring_once() {
    // Columns 0..=2 form a wet ring around a dry centre; column 3 is dry.
    let mut board = BoardGraph::rectangle(4, 3, AdjacencyOffsets::four_way());
    wet(
        &mut board,
        &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)],
    );
    let state = BattleState::new(
        Combatant::player(30, Position::new(3, 1)),
        vec![
            Combatant::enemy(CombatantId(1), 20, Position::new(0, 0)),
            Combatant::enemy(CombatantId(2), 20, Position::new(2, 0)).with_block(2),
            Combatant::enemy(CombatantId(3), 20, Position::new(2, 2)),
            Combatant::enemy(CombatantId(4), 20, Position::new(1, 1)),
        ],
        Some(board),
    )
    .unwrap();
    let mut engine = started(state);

    let report = engine.declare_action(&thunder(1, 4)).unwrap();

    let strike = report.strike.unwrap();
    assert_eq!(strike.outcome.reaction, Some(Reaction::Conduct));
    let mut victims = strike.outcome.chain_targets().to_vec();
    victims.sort();
    assert_eq!(victims, vec![CombatantId(2), CombatantId(3)]);
    assert_eq!(strike.chain.len(), 2);

    assert_eq!(health(&engine, 1), 16);
    assert_eq!(health(&engine, 2), 18);
    assert_eq!(health(&engine, 3), 16);
    assert_eq!(health(&engine, 4), 20);
    assert_eq!(engine.state().player().health.current, 30);

    // Victims are shocked, not tagged.
    for id in [2, 3] {
        assert!(engine.state().combatant(CombatantId(id)).unwrap().tags.is_empty());
    }
    assert_eq!(
        engine.state().combatant(CombatantId(1)).unwrap().tags,
        ElementSet::THUNDER
    );
}

#[test]
fn wet_units_bridge_dry_tiles() {
    let mut board = BoardGraph::rectangle(5, 1, AdjacencyOffsets::four_way());
    wet(&mut board, &[(0, 0), (2, 0)]);
    let state = BattleState::new(
        Combatant::player(30, Position::new(4, 0)),
        vec![
            Combatant::enemy(CombatantId(1), 20, Position::new(0, 0)),
            Combatant::enemy(CombatantId(2), 20, Position::new(1, 0)).with_tags(ElementSet::WATER),
            Combatant::enemy(CombatantId(3), 20, Position::new(2, 0)),
            Combatant::enemy(CombatantId(4), 20, Position::new(3, 0)),
        ],
        Some(board),
    )
    .unwrap();
    let mut engine = started(state);

    let report = engine.declare_action(&thunder(1, 3)).unwrap();

    assert_eq!(
        report.strike.unwrap().outcome.chain_targets(),
        &[CombatantId(2), CombatantId(3)]
    );
    assert_eq!(health(&engine, 2), 17);
    assert_eq!(health(&engine, 3), 17);
    assert_eq!(health(&engine, 4), 20);
}

#[test]
fn a_wet_defender_on_dry_ground_still_conducts() {
    let mut board = BoardGraph::rectangle(3, 1, AdjacencyOffsets::four_way());
    wet(&mut board, &[(1, 0)]);
    let state = BattleState::new(
        Combatant::player(30, Position::new(0, 0)),
        vec![
            Combatant::enemy(CombatantId(1), 20, Position::new(2, 0)).with_tags(ElementSet::WATER),
        ],
        Some(board),
    )
    .unwrap();
    let mut engine = started(state);

    let report = engine.declare_action(&thunder(1, 5)).unwrap();

    // The walk enters the wet tile but the player's own tile is dry.
    let strike = report.strike.unwrap();
    assert_eq!(strike.outcome.reaction, Some(Reaction::Conduct));
    assert!(strike.outcome.chain_targets().is_empty());
    assert_eq!(health(&engine, 1), 15);
    assert_eq!(engine.state().player().health.current, 30);
}

#[test]
fn fire_takes_priority_over_conduction() {
    let mut board = BoardGraph::rectangle(2, 1, AdjacencyOffsets::four_way());
    wet(&mut board, &[(0, 0), (1, 0)]);
    let state = BattleState::new(
        Combatant::player(30, Position::new(0, 0)),
        vec![
            Combatant::enemy(CombatantId(1), 20, Position::new(1, 0)).with_tags(ElementSet::FIRE),
        ],
        Some(board),
    )
    .unwrap();
    let mut engine = started(state);

    let report = engine.declare_action(&thunder(1, 4)).unwrap();

    assert_eq!(
        report.strike.unwrap().outcome.reaction,
        Some(Reaction::Overload)
    );
}

#[test]
fn no_board_means_no_current() {
    let state = BattleState::new(
        Combatant::player(30, Position::new(0, 0)),
        vec![
            Combatant::enemy(CombatantId(1), 20, Position::new(1, 0)).with_tags(ElementSet::WATER),
            Combatant::enemy(CombatantId(2), 20, Position::new(2, 0)).with_tags(ElementSet::WATER),
        ],
        None,
    )
    .unwrap();
    let mut engine = started(state);

    let report = engine.declare_action(&thunder(1, 4)).unwrap();

    let strike = report.strike.unwrap();
    assert_eq!(strike.outcome.reaction, Some(Reaction::Conduct));
    assert!(strike.outcome.chain.is_none());
    assert_eq!(health(&engine, 1), 16);
    assert_eq!(health(&engine, 2), 20);
    assert_eq!(
        engine.state().combatant(CombatantId(1)).unwrap().tags,
        ElementSet::WATER | ElementSet::THUNDER
    );
}

#[test]
fn conduction_spends_the_victims_armed_flags() {
    let mut board = BoardGraph::rectangle(5, 1, AdjacencyOffsets::four_way());
    wet(&mut board, &[(0, 0), (1, 0)]);
    let mut primed = Combatant::enemy(CombatantId(2), 20, Position::new(1, 0));
    primed.armed = ArmedFlags::THUNDERSTRIKE;
    let state = BattleState::new(
        Combatant::player(30, Position::new(4, 0)),
        vec![Combatant::enemy(CombatantId(1), 20, Position::new(0, 0)), primed],
        Some(board),
    )
    .unwrap();
    let mut engine = started(state);

    engine.declare_action(&thunder(1, 4)).unwrap();

    assert_eq!(health(&engine, 1), 16);
    assert_eq!(health(&engine, 2), 12);
    assert!(engine.state().combatant(CombatantId(2)).unwrap().armed.is_empty());

    // The flag is gone, so the next shock lands at face value.
    engine.declare_action(&thunder(1, 4)).unwrap();
    assert_eq!(health(&engine, 2), 8);
}
