//! Synchronization barriers inside the enemy turn.
//!
//! The barriers are discrete phase boundaries. Correctness never depends on
//! wall-clock time; a presentation host may pace itself here.

/// Named points the enemy turn waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncBarrier {
    /// Every turn-start effect has settled; enemies are about to act.
    TurnStartSettled,
    /// Every enemy action has settled; cleanup is about to run.
    ActionsSettled,
}

/// Host hook invoked at each barrier. It must not touch the battle.
pub trait Scheduler {
    fn barrier(&mut self, barrier: SyncBarrier);
}

/// Scheduler that continues immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn barrier(&mut self, _barrier: SyncBarrier) {}
}
