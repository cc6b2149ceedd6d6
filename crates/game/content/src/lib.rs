//! Data-driven battle content and loaders.
//!
//! This crate houses the enemy behaviours scenarios can name and provides
//! loaders for RON/TOML data files:
//! - Battle configuration (data-driven via TOML)
//! - Battle scenarios: board layout, units, behaviours and scripted player
//!   actions (data-driven via RON)
//!
//! All loaders use battle-core types directly with serde for RON/TOML
//! deserialization.

pub mod behaviors;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use behaviors::{BehaviorSpec, Cycle, GuardSelf, StrikePlayer};

#[cfg(feature = "loaders")]
pub use loaders::{
    AdjacencySpec, BoardSpec, ConfigLoader, ContentFactory, EnemySpec, PlayerSpec,
    ScenarioLoader, ScenarioSpec, ScriptedAction, TileSpec,
};
