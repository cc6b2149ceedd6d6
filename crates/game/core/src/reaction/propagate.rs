//! Target collection for chain reactions.
//!
//! Both shapes only read the battle state. They return the victims in a
//! stable order and never include the struck defender. Without a board
//! there is nothing to walk, so both return an empty set.

use std::collections::{BTreeSet, VecDeque};

use tracing::trace;

use crate::element::ElementType;
use crate::state::{BattleState, BoardGraph, CombatantId, Position};

/// Every other living combatant within `radius` grid units of the defender.
///
/// Single pass, no recursion. Victims come back in registry order (player
/// first, then enemies in action order).
pub fn radius_targets(state: &BattleState, defender: CombatantId, radius: f32) -> Vec<CombatantId> {
    if state.board().is_none() {
        return Vec::new();
    }
    let Some(origin) = state.combatant(defender).map(|unit| unit.position) else {
        return Vec::new();
    };

    state
        .combatants()
        .filter(|unit| unit.id != defender && unit.is_alive())
        .filter(|unit| unit.position.distance(origin) <= radius)
        .map(|unit| unit.id)
        .collect()
}

/// Breadth-first walk from the defender's tile through conductive tiles.
///
/// A tile conducts if it carries Water or its living occupant does. Only
/// conductive tiles are entered, each at most once, so the walk terminates on
/// any graph including cyclic ones. Occupants of visited tiles other than the
/// defender are returned in discovery order.
pub fn conduction_targets(state: &BattleState, defender: CombatantId) -> Vec<CombatantId> {
    let Some(board) = state.board() else {
        return Vec::new();
    };
    let Some(start) = state.combatant(defender).map(|unit| unit.position) else {
        return Vec::new();
    };
    if !board.contains(start) {
        return Vec::new();
    }

    let mut visited = BTreeSet::from([start]);
    let mut frontier = VecDeque::from([start]);
    let mut targets = Vec::new();

    while let Some(position) = frontier.pop_front() {
        if let Some(unit) = state.occupant_at(position) {
            if unit.id != defender {
                targets.push(unit.id);
            }
        }

        for next in board.neighbors(position) {
            if visited.contains(&next) || !conducts(state, board, next) {
                continue;
            }
            trace!(target: "battle::chain", from = %position, to = %next, "conduction step");
            visited.insert(next);
            frontier.push_back(next);
        }
    }

    targets
}

fn conducts(state: &BattleState, board: &BoardGraph, position: Position) -> bool {
    board.tile_has(position, ElementType::Water)
        || state
            .occupant_at(position)
            .is_some_and(|unit| unit.tags.has(ElementType::Water))
}

/// The defender's tile followed by every existing adjacent tile.
pub fn spread_tiles(state: &BattleState, defender: CombatantId) -> Vec<Position> {
    let Some(board) = state.board() else {
        return Vec::new();
    };
    let Some(origin) = state.combatant(defender).map(|unit| unit.position) else {
        return Vec::new();
    };
    if !board.contains(origin) {
        return Vec::new();
    }

    let mut tiles = vec![origin];
    for neighbor in board.neighbors(origin) {
        if !tiles.contains(&neighbor) {
            tiles.push(neighbor);
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementSet;
    use crate::state::{AdjacencyOffsets, Combatant, Tile};

    fn state_on(board: BoardGraph, enemies: Vec<Combatant>) -> BattleState {
        BattleState::new(Combatant::player(30, Position::new(0, 0)), enemies, Some(board)).unwrap()
    }

    fn enemy(id: u32, x: i32, y: i32) -> Combatant {
        Combatant::enemy(CombatantId(id), 10, Position::new(x, y))
    }

    #[test]
    fn radius_includes_the_boundary_and_the_player() {
        let board = BoardGraph::rectangle(6, 6, AdjacencyOffsets::four_way());
        let state = state_on(
            board,
            vec![enemy(1, 2, 1), enemy(2, 3, 2), enemy(3, 5, 5), enemy(4, 0, 1)],
        );

        // (3,2) is sqrt(2) away, (0,1) is 2 away, (0,0) is sqrt(5) ~ 2.236 away.
        let targets = radius_targets(&state, CombatantId(1), 2.3);
        assert_eq!(
            targets,
            vec![CombatantId::PLAYER, CombatantId(2), CombatantId(4)]
        );
    }

    #[test]
    fn radius_ignores_the_board_lattice() {
        let layout = || vec![enemy(1, 1, 1), enemy(2, 3, 0), enemy(3, 3, 2), enemy(4, 2, 3)];
        let square = state_on(
            BoardGraph::rectangle(5, 5, AdjacencyOffsets::four_way()),
            layout(),
        );
        let staggered = state_on(
            BoardGraph::rectangle(5, 5, AdjacencyOffsets::odd_row_shifted()),
            layout(),
        );

        // (3,0) and (3,2) are sqrt(5) from (1,1) on raw coordinates; a
        // half-cell shift of row 1 would pull them to ~1.8.
        let expected = vec![
            CombatantId::PLAYER,
            CombatantId(2),
            CombatantId(3),
            CombatantId(4),
        ];
        assert_eq!(radius_targets(&square, CombatantId(1), 2.3), expected);
        assert_eq!(radius_targets(&staggered, CombatantId(1), 2.3), expected);
    }

    #[test]
    fn radius_skips_the_dead() {
        let board = BoardGraph::rectangle(4, 4, AdjacencyOffsets::four_way());
        let mut dead = enemy(2, 2, 1);
        dead.health.current = 0;
        let state = state_on(board, vec![enemy(1, 1, 1), dead]);

        assert_eq!(
            radius_targets(&state, CombatantId(1), 2.3),
            vec![CombatantId::PLAYER]
        );
    }

    #[test]
    fn chains_need_a_board() {
        let state = BattleState::new(
            Combatant::player(30, Position::ORIGIN),
            vec![enemy(1, 1, 0).with_tags(ElementSet::WATER), enemy(2, 2, 0)],
            None,
        )
        .unwrap();

        assert!(radius_targets(&state, CombatantId(1), 2.3).is_empty());
        assert!(conduction_targets(&state, CombatantId(1)).is_empty());
        assert!(spread_tiles(&state, CombatantId(1)).is_empty());
    }

    #[test]
    fn conduction_follows_wet_tiles_and_wet_units() {
        // Water runs along (1,0)..=(3,0). The player at (0,0) is dry.
        let mut board = BoardGraph::rectangle(6, 2, AdjacencyOffsets::four_way());
        for x in 1..=3 {
            board
                .replace_tile(Tile::new(Position::new(x, 0)).with_tags(ElementSet::WATER))
                .unwrap();
        }
        let state = state_on(
            board,
            vec![
                enemy(1, 1, 0),
                enemy(2, 3, 0),
                // Dry unit on a dry tile next to the wet path: not reached.
                enemy(3, 2, 1),
                // Wet unit on a dry tile: conducts.
                enemy(4, 4, 0).with_tags(ElementSet::WATER),
                // Beyond the wet unit on a dry tile: not reached.
                enemy(5, 5, 0),
            ],
        );

        let targets = conduction_targets(&state, CombatantId(1));
        assert_eq!(targets, vec![CombatantId(2), CombatantId(4)]);
    }

    #[test]
    fn conduction_visits_each_tile_once_on_cycles() {
        let mut board = BoardGraph::rectangle(3, 3, AdjacencyOffsets::four_way());
        for tile in board.tiles().map(Tile::position).collect::<Vec<_>>() {
            board
                .replace_tile(Tile::new(tile).with_tags(ElementSet::WATER))
                .unwrap();
        }
        let state = BattleState::new(
            Combatant::player(30, Position::new(2, 2)),
            vec![enemy(1, 1, 1), enemy(2, 0, 0), enemy(3, 2, 0)],
            Some(board),
        )
        .unwrap();

        let mut targets = conduction_targets(&state, CombatantId(1));
        let total = targets.len();
        targets.sort();
        targets.dedup();
        assert_eq!(total, targets.len());
        assert_eq!(
            targets,
            vec![CombatantId::PLAYER, CombatantId(2), CombatantId(3)]
        );
    }

    #[test]
    fn spread_covers_the_tile_and_its_neighbors() {
        let board = BoardGraph::rectangle(3, 3, AdjacencyOffsets::four_way());
        let state = state_on(board, vec![enemy(1, 0, 2)]);

        let mut tiles = spread_tiles(&state, CombatantId(1));
        tiles.sort();
        assert_eq!(
            tiles,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 2)]
        );
    }
}
