use super::BattlePhase;

/// Progression collaborator notified of phase changes and the battle result.
///
/// Every method defaults to a no-op.
pub trait BattleObserver {
    fn on_phase(&mut self, _phase: BattlePhase, _turn: u32) {}

    fn on_victory(&mut self) {}

    fn on_defeat(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl BattleObserver for NullObserver {}
