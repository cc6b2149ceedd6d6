//! Enemy behaviours that scenarios can name.
//!
//! Every behaviour acts through [`TurnContext`], so its hits take the same
//! reaction and damage pipeline as the player's.

use battle_core::{ElementType, EnemyBehavior, Passive, TurnContext};

/// Serializable description of an enemy's turn.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorSpec {
    /// Does nothing.
    #[default]
    Idle,
    /// Hits the player.
    Strike {
        #[cfg_attr(feature = "serde", serde(default))]
        element: Option<ElementType>,
        damage: u32,
    },
    /// Raises its own block.
    Guard { block: u32 },
    /// Runs each step in turn, wrapping around.
    Cycle(Vec<BehaviorSpec>),
}

impl BehaviorSpec {
    pub fn build(&self) -> Box<dyn EnemyBehavior> {
        match self {
            BehaviorSpec::Idle => Box::new(Passive),
            BehaviorSpec::Strike { element, damage } => Box::new(StrikePlayer {
                element: *element,
                damage: *damage,
            }),
            BehaviorSpec::Guard { block } => Box::new(GuardSelf { block: *block }),
            BehaviorSpec::Cycle(steps) => {
                Box::new(Cycle::new(steps.iter().map(BehaviorSpec::build).collect()))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikePlayer {
    pub element: Option<ElementType>,
    pub damage: u32,
}

impl EnemyBehavior for StrikePlayer {
    fn act(&mut self, ctx: &mut TurnContext<'_>) {
        ctx.strike_player(self.element, self.damage);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardSelf {
    pub block: u32,
}

impl EnemyBehavior for GuardSelf {
    fn act(&mut self, ctx: &mut TurnContext<'_>) {
        ctx.guard(self.block);
    }
}

/// Rotates through a fixed list of behaviours, one per action.
pub struct Cycle {
    steps: Vec<Box<dyn EnemyBehavior>>,
    next: usize,
}

impl Cycle {
    pub fn new(steps: Vec<Box<dyn EnemyBehavior>>) -> Self {
        Self { steps, next: 0 }
    }
}

impl EnemyBehavior for Cycle {
    fn act(&mut self, ctx: &mut TurnContext<'_>) {
        if self.steps.is_empty() {
            return;
        }
        let index = self.next % self.steps.len();
        self.next = index + 1;
        self.steps[index].act(ctx);
    }
}
