//! Deterministic battle rules for a grid tactical card battler.
//!
//! `battle-core` defines the elemental reaction table, the damage pipeline and
//! the turn resolution state machine. All state mutation flows through
//! [`engine::BattleEngine`]; content loaders and clients depend on the types
//! re-exported here.
pub mod combat;
pub mod config;
pub mod element;
pub mod engine;
pub mod env;
pub mod error;
pub mod reaction;
pub mod state;

pub use combat::{DamageKind, DamageReport};
pub use config::BattleConfig;
pub use element::{ElementSet, ElementType};
pub use engine::{
    ActionDeclaration, ActionRejected, ActionReport, BattleEngine, BattleEngineBuilder,
    BattleEvent, BattleHook, BattleObserver, BattlePhase, EnemyBehavior, EnergyOnDefeatHook,
    EventMask, ImmediateScheduler, NullObserver, Passive, Scheduler, StrikeReport, SyncBarrier,
    TidalArmorHook, TurnContext, TurnError, TurnReport,
};
pub use env::{BoardProvider, FixedRoll, NoBoard, PcgRng, RngOracle};
pub use error::{ErrorSeverity, GameError};
pub use reaction::{Reaction, ReactionOutcome, StatusApplied, Strike, TagMutation};
pub use state::{
    AdjacencyOffsets, ArmedFlags, BattleState, BoardError, BoardGraph, Combatant, CombatantId,
    GridOffset, MoveError, PlayerResources, Position, ResourceMeter, SetupError, Side,
    StatusCounters, Tile, UnitClass,
};
