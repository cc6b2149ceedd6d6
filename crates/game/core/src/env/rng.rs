//! RNG oracle for deterministic random number generation.
//!
//! Resistance rolls (a boss shrugging off a freeze) are the only random events
//! in a battle. They draw from an injected [`RngOracle`] so tests and replays
//! can pin every outcome.
//!
//! # Determinism
//!
//! All RNG implementations must be deterministic: given the same seed,
//! they must produce the same sequence of random numbers.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Returns true with `percent`% probability.
    fn chance(&self, seed: u64, percent: u32) -> bool {
        match percent {
            0 => false,
            p if p >= 100 => true,
            p => self.roll_d100(seed) <= p,
        }
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR output permutation over a 64-bit LCG step.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Oracle that returns the same d100 roll for every seed.
///
/// Useful for pinning resistance outcomes: `FixedRoll(1)` passes every
/// chance check, `FixedRoll(100)` fails every check below 100%.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedRoll(pub u32);

impl RngOracle for FixedRoll {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0.clamp(1, 100) - 1
    }
}

/// Compute deterministic seed from battle state components.
///
/// # Arguments
///
/// * `battle_seed` - Base seed set at battle start
/// * `nonce` - Resolution sequence number (increments each resolution)
/// * `target_id` - Combatant the roll is made for
/// * `context` - Distinguishes independent rolls within one resolution
pub fn compute_seed(battle_seed: u64, nonce: u64, target_id: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (target_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
