//! Traits describing collaborators the engine consumes.
//!
//! The board provider hands over the board graph at battle start and the RNG
//! oracle supplies resistance rolls. Both are injected explicitly; the engine
//! never looks them up on its own.
mod board;
mod rng;

pub use board::{BoardProvider, NoBoard};
pub use rng::{FixedRoll, PcgRng, RngOracle, compute_seed};
