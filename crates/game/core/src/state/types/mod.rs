pub mod combatant;
pub mod common;
pub mod tile;

// Re-export combatant types
pub use combatant::{ArmedFlags, Combatant, Side, StatusCounters, UnitClass};

// Re-export common types
pub use common::{CombatantId, GridOffset, Position, ResourceMeter};

// Re-export tile types
pub use tile::Tile;
