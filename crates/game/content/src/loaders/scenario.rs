//! Battle scenario loader.
//!
//! A scenario is everything needed to start a battle: the optional board, the
//! player, the enemies in action order with their behaviours, and a script of
//! player actions for headless runs.

use std::path::Path;
use std::sync::Arc;

use battle_core::{
    ActionDeclaration, AdjacencyOffsets, BattleConfig, BattleEngine, BattleEngineBuilder,
    BattleHook, BattleState, BoardError, BoardGraph, BoardProvider, Combatant, CombatantId,
    ElementSet, ElementType, EnemyBehavior, EnergyOnDefeatHook, GridOffset, NoBoard, Position,
    TidalArmorHook, Tile, UnitClass,
};
use serde::{Deserialize, Serialize};

use crate::behaviors::BehaviorSpec;
use crate::loaders::{LoadResult, read_file};

/// Scenario file contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    /// `None` runs the battle without a board.
    #[serde(default)]
    pub board: Option<BoardSpec>,
    pub player: PlayerSpec,
    /// Enemies in action order.
    pub enemies: Vec<EnemySpec>,
    /// Player actions replayed in order, wrapping around.
    #[serde(default)]
    pub actions: Vec<ScriptedAction>,
    /// Energy the player regains whenever an enemy falls.
    #[serde(default)]
    pub energy_on_defeat: Option<u32>,
}

/// Neighbour relation of a scenario board.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdjacencySpec {
    #[default]
    FourWay,
    OddRowShifted,
    Custom {
        even_row: Vec<(i32, i32)>,
        odd_row: Vec<(i32, i32)>,
    },
}

impl AdjacencySpec {
    fn offsets(&self) -> AdjacencyOffsets {
        let convert = |offsets: &[(i32, i32)]| {
            offsets
                .iter()
                .map(|&(dx, dy)| GridOffset::new(dx, dy))
                .collect::<Vec<_>>()
        };
        match self {
            AdjacencySpec::FourWay => AdjacencyOffsets::four_way(),
            AdjacencySpec::OddRowShifted => AdjacencyOffsets::odd_row_shifted(),
            AdjacencySpec::Custom { even_row, odd_row } => AdjacencyOffsets {
                even_row: convert(even_row),
                odd_row: convert(odd_row),
            },
        }
    }
}

/// Rectangular board with optional holes and pre-tagged tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub adjacency: AdjacencySpec,
    /// Cells inside the rectangle that have no tile.
    #[serde(default)]
    pub holes: Vec<(i32, i32)>,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
}

impl BoardSpec {
    pub fn build(&self) -> Result<BoardGraph, BoardError> {
        let mut board = BoardGraph::new(self.adjacency.offsets());
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if !self.holes.contains(&(x, y)) {
                    board.insert_tile(Tile::new(Position::new(x, y)))?;
                }
            }
        }
        for tile in &self.tiles {
            board.replace_tile(tile.build())?;
        }
        Ok(board)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub at: (i32, i32),
    #[serde(default)]
    pub tags: Vec<ElementType>,
    /// Damage dealt to an occupant at each turn start.
    #[serde(default)]
    pub miasma: Option<u32>,
}

impl TileSpec {
    fn build(&self) -> Tile {
        let tile = Tile::new(Position::new(self.at.0, self.at.1)).with_tags(tag_set(&self.tags));
        match self.miasma {
            Some(damage) => tile.with_miasma(damage),
            None => tile,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub health: u32,
    pub position: (i32, i32),
    #[serde(default)]
    pub tags: Vec<ElementType>,
    #[serde(default)]
    pub energy_bonus: u32,
    #[serde(default)]
    pub pending_draw: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub id: u32,
    pub health: u32,
    pub position: (i32, i32),
    #[serde(default)]
    pub class: UnitClass,
    #[serde(default)]
    pub tags: Vec<ElementType>,
    #[serde(default)]
    pub block: u32,
    #[serde(default)]
    pub melee_damage_reduce: u32,
    #[serde(default = "default_ratio")]
    pub damage_taken_ratio: f32,
    #[serde(default = "default_resets_block")]
    pub resets_block: bool,
    #[serde(default)]
    pub behavior: BehaviorSpec,
    /// Block gained per hit taken while carrying Water.
    #[serde(default)]
    pub tidal_armor: Option<u32>,
}

fn default_ratio() -> f32 {
    1.0
}

fn default_resets_block() -> bool {
    true
}

impl EnemySpec {
    /// Rejects values the engine treats as programming errors.
    fn validate(&self) -> LoadResult<()> {
        anyhow::ensure!(
            !CombatantId(self.id).is_player(),
            "enemy id {} is reserved for the player",
            self.id
        );
        anyhow::ensure!(
            self.damage_taken_ratio.is_finite() && self.damage_taken_ratio >= 0.0,
            "enemy {} damage_taken_ratio must be finite and non-negative (got {})",
            self.id,
            self.damage_taken_ratio
        );
        Ok(())
    }

    fn build(&self) -> Combatant {
        Combatant::enemy(
            CombatantId(self.id),
            self.health,
            Position::new(self.position.0, self.position.1),
        )
        .with_class(self.class)
        .with_tags(tag_set(&self.tags))
        .with_block(self.block)
        .with_melee_damage_reduce(self.melee_damage_reduce)
        .with_damage_taken_ratio(self.damage_taken_ratio)
        .with_resets_block(self.resets_block)
    }
}

/// One scripted player action.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptedAction {
    /// Explicit target. `None` picks the first living enemy.
    #[serde(default)]
    pub target: Option<u32>,
    #[serde(default)]
    pub element: Option<ElementType>,
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub block: u32,
    #[serde(default)]
    pub piercing: bool,
}

impl ScriptedAction {
    /// Resolves the target against `state`. Returns `None` when no enemy is
    /// left to aim at.
    pub fn declaration(&self, state: &BattleState) -> Option<ActionDeclaration> {
        let target = match self.target {
            Some(id) => CombatantId(id),
            None => state.enemies().iter().find(|enemy| enemy.is_alive())?.id,
        };
        let mut action = ActionDeclaration::strike(target, self.element, self.damage, self.cost)
            .with_block_gain(self.block);
        if self.piercing {
            action = action.piercing();
        }
        Some(action)
    }
}

fn tag_set(tags: &[ElementType]) -> ElementSet {
    tags.iter().fold(ElementSet::empty(), |set, element| set | element.flag())
}

impl ScenarioSpec {
    /// Builds the board described by the scenario, if any.
    pub fn board_graph(&self) -> LoadResult<Option<BoardGraph>> {
        self.board
            .as_ref()
            .map(|spec| {
                spec.build()
                    .map_err(|e| anyhow::anyhow!("Invalid board in scenario '{}': {}", self.name, e))
            })
            .transpose()
    }

    /// Assembles the initial battle state.
    pub fn build_state(&self) -> LoadResult<BattleState> {
        let player = Combatant::player(
            self.player.health,
            Position::new(self.player.position.0, self.player.position.1),
        )
        .with_tags(tag_set(&self.player.tags));
        for enemy in &self.enemies {
            enemy
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid scenario '{}': {}", self.name, e))?;
        }
        let enemies = self.enemies.iter().map(EnemySpec::build).collect();

        let board = self.board_graph()?;
        let provider: &dyn BoardProvider = match &board {
            Some(board) => board,
            None => &NoBoard,
        };
        let mut state = BattleState::from_provider(player, enemies, provider)
            .map_err(|e| anyhow::anyhow!("Invalid scenario '{}': {}", self.name, e))?
            .with_seed(self.seed);
        state.resources.energy_bonus = self.player.energy_bonus;
        state.resources.pending_draw = self.player.pending_draw;

        Ok(state)
    }

    /// Behaviours of every enemy, keyed by id.
    pub fn behaviors(&self) -> Vec<(CombatantId, Box<dyn EnemyBehavior>)> {
        self.enemies
            .iter()
            .map(|enemy| (CombatantId(enemy.id), enemy.behavior.build()))
            .collect()
    }

    /// Hooks the scenario asks for.
    pub fn hooks(&self) -> Vec<Arc<dyn BattleHook>> {
        let mut hooks: Vec<Arc<dyn BattleHook>> = self
            .enemies
            .iter()
            .filter_map(|enemy| {
                enemy.tidal_armor.map(|block_per_hit| {
                    Arc::new(TidalArmorHook {
                        owner: CombatantId(enemy.id),
                        block_per_hit,
                    }) as Arc<dyn BattleHook>
                })
            })
            .collect();
        if let Some(amount) = self.energy_on_defeat {
            hooks.push(Arc::new(EnergyOnDefeatHook { amount }));
        }
        hooks
    }

    /// Engine builder with the scenario's state, behaviours and hooks wired
    /// in. Hosts add their own observer, scheduler and RNG.
    pub fn engine_builder(&self, config: BattleConfig) -> LoadResult<BattleEngineBuilder> {
        let state = self.build_state()?;
        tracing::info!(
            scenario = %self.name,
            enemies = self.enemies.len(),
            board = self.board.is_some(),
            "Creating battle from scenario"
        );

        let mut builder = BattleEngine::builder(state).config(config);
        for (id, behavior) in self.behaviors() {
            builder = builder.boxed_behavior(id, behavior);
        }
        for hook in self.hooks() {
            builder = builder.shared_hook(hook);
        }
        Ok(builder)
    }
}

/// Loader for battle scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    ///
    /// The scenario is assembled once while loading so layout mistakes
    /// surface here rather than at battle start.
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load scenario {}: {}", path.display(), e))
    }

    /// Parse a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let spec: ScenarioSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        spec.build_state()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const RUINS: &str = r#"
(
    name: "ruins",
    seed: 7,
    board: Some((
        width: 4,
        height: 2,
        holes: [(3, 1)],
        tiles: [
            (at: (1, 0), tags: [Water]),
            (at: (2, 0), tags: [Water], miasma: Some(2)),
        ],
    )),
    player: (health: 40, position: (0, 1), energy_bonus: 1),
    enemies: [
        (id: 1, health: 12, position: (1, 0), behavior: Strike(element: Some(Fire), damage: 3)),
        (
            id: 2,
            health: 30,
            position: (2, 0),
            class: Boss,
            tags: [Water],
            tidal_armor: Some(2),
            behavior: Cycle([Guard(block: 4), Strike(damage: 5)]),
        ),
    ],
    actions: [
        (element: Some(Thunder), damage: 4, cost: 1),
        (target: Some(2), damage: 6, cost: 2, piercing: true),
    ],
    energy_on_defeat: Some(1),
)
"#;

    #[test]
    fn test_load_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ruins.ron");
        fs::write(&path, RUINS).unwrap();

        let spec = ScenarioLoader::load(&path).unwrap();
        assert_eq!(spec.name, "ruins");
        assert_eq!(spec.enemies.len(), 2);
        assert_eq!(spec.enemies[1].class, UnitClass::Boss);
        assert_eq!(spec.enemies[0].damage_taken_ratio, 1.0);
        assert!(spec.enemies[0].resets_block);
        assert_eq!(spec.hooks().len(), 2);

        let state = spec.build_state().unwrap();
        assert_eq!(state.seed, 7);
        assert_eq!(state.resources.energy_bonus, 1);
        let board = state.board().unwrap();
        assert_eq!(board.len(), 7);
        assert!(!board.contains(Position::new(3, 1)));
        assert_eq!(board.tile(Position::new(2, 0)).unwrap().miasma(), Some(2));
        assert_eq!(board.occupant(Position::new(1, 0)), Some(CombatantId(1)));
    }

    #[test]
    fn test_scripted_targets() {
        let spec = ScenarioLoader::parse(RUINS).unwrap();
        let mut state = spec.build_state().unwrap();

        let first = spec.actions[0].declaration(&state).unwrap();
        assert_eq!(first.target, CombatantId(1));
        assert_eq!(first.element, Some(ElementType::Thunder));

        let second = spec.actions[1].declaration(&state).unwrap();
        assert_eq!(second.target, CombatantId(2));
        assert!(second.true_damage);

        state.combatant_mut(CombatantId(1)).unwrap().health.current = 0;
        let retargeted = spec.actions[0].declaration(&state).unwrap();
        assert_eq!(retargeted.target, CombatantId(2));
    }

    #[test]
    fn test_scenario_drives_a_battle() {
        let spec = ScenarioLoader::parse(RUINS).unwrap();
        let mut engine = spec.engine_builder(BattleConfig::default()).unwrap().build();
        engine.start().unwrap();
        assert_eq!(engine.state().resources.energy, 4);

        // Thunder on a unit standing in water conducts to the wet boss.
        let action = spec.actions[0].declaration(engine.state()).unwrap();
        let report = engine.declare_action(&action).unwrap();
        assert_eq!(
            report.strike.unwrap().outcome.chain_targets(),
            &[CombatantId(2)]
        );
        // Tidal armour triggered on the chain hit.
        assert_eq!(engine.state().combatant(CombatantId(2)).unwrap().block, 2);
    }

    #[test]
    fn test_boardless_scenario() {
        let spec = ScenarioLoader::parse(
            r#"(
                name: "open_field",
                player: (health: 20, position: (0, 0)),
                enemies: [(id: 1, health: 5, position: (0, 0))],
            )"#,
        )
        .unwrap();

        let state = spec.build_state().unwrap();
        assert!(state.board().is_none());
        assert!(spec.actions.is_empty());
        assert!(spec.hooks().is_empty());
    }

    #[test]
    fn test_tile_outside_board_is_rejected() {
        let err = ScenarioLoader::parse(
            r#"(
                name: "broken",
                board: Some((width: 2, height: 1, tiles: [(at: (5, 5), tags: [Ice])])),
                player: (health: 20, position: (0, 0)),
                enemies: [(id: 1, health: 5, position: (1, 0))],
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid board"));
    }

    #[test]
    fn test_duplicate_enemy_ids_are_rejected() {
        let err = ScenarioLoader::parse(
            r#"(
                name: "twins",
                player: (health: 20, position: (0, 0)),
                enemies: [
                    (id: 1, health: 5, position: (1, 0)),
                    (id: 1, health: 5, position: (2, 0)),
                ],
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid scenario 'twins'"));
    }

    #[test]
    fn test_negative_damage_ratio_is_rejected() {
        let err = ScenarioLoader::parse(
            r#"(
                name: "glass",
                player: (health: 20, position: (0, 0)),
                enemies: [(id: 1, health: 5, position: (1, 0), damage_taken_ratio: -1.0)],
            )"#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid scenario 'glass'"), "{message}");
        assert!(message.contains("damage_taken_ratio"), "{message}");
    }

    #[test]
    fn test_enemy_with_player_id_is_rejected() {
        let err = ScenarioLoader::parse(
            r#"(
                name: "impostor",
                player: (health: 20, position: (0, 0)),
                enemies: [(id: 0, health: 5, position: (1, 0))],
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reserved for the player"));
    }

    #[test]
    fn test_unknown_element_fails_to_parse() {
        let err = ScenarioLoader::parse(
            r#"(
                name: "bad",
                player: (health: 20, position: (0, 0), tags: [Lava]),
                enemies: [(id: 1, health: 5, position: (1, 0))],
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to parse scenario RON"));
    }
}
