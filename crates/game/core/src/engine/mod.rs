//! Turn resolution state machine.
//!
//! The [`BattleEngine`] is the authoritative owner of a [`BattleState`]. It
//! validates player declarations, drives every strike through the reaction
//! table and the damage pipeline, runs the enemy turn between two named
//! barriers and checks for a terminal state after every phase.
//!
//! Collaborators are injected through the builder: the RNG oracle, one
//! [`EnemyBehavior`] per enemy, event hooks, the progression observer and
//! the scheduler. Nothing is looked up globally.

mod action;
mod enemy;
mod errors;
mod event;
mod hook;
mod observer;
mod phase;
mod resolution;
mod scheduler;
mod turns;

pub use action::{ActionDeclaration, ActionReport, TurnReport};
pub use enemy::{EnemyBehavior, Passive, TurnContext};
pub use errors::{ActionRejected, TurnError};
pub use event::{BattleEvent, EventMask};
pub use hook::{BattleHook, EnergyOnDefeatHook, HookRegistry, TidalArmorHook};
pub use observer::{BattleObserver, NullObserver};
pub use phase::BattlePhase;
pub use resolution::StrikeReport;
pub use scheduler::{ImmediateScheduler, Scheduler, SyncBarrier};
pub use turns::tick_turn_start;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::combat::DamageKind;
use crate::config::BattleConfig;
use crate::env::{PcgRng, RngOracle};
use crate::error::GameError;
use crate::reaction::Strike;
use crate::state::{BattleState, CombatantId, Side};

use resolution::execute_strike;

/// Battle engine that owns the state and drives the phase state machine.
pub struct BattleEngine {
    state: BattleState,
    config: BattleConfig,
    phase: BattlePhase,
    turn: u32,

    rng: Box<dyn RngOracle>,
    behaviors: BTreeMap<CombatantId, Box<dyn EnemyBehavior>>,
    hooks: HookRegistry,
    observer: Box<dyn BattleObserver>,
    scheduler: Box<dyn Scheduler>,

    /// Combatants whose defeat has already been announced.
    defeated: BTreeSet<CombatantId>,
}

impl BattleEngine {
    pub fn builder(state: BattleState) -> BattleEngineBuilder {
        BattleEngineBuilder::new(state)
    }

    /// Creates an engine with default collaborators.
    pub fn new(state: BattleState, config: BattleConfig) -> Self {
        Self::builder(state).config(config).build()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Current round number. Zero before the battle starts.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Leaves `Setup` and enters the first player turn.
    pub fn start(&mut self) -> Result<TurnReport, TurnError> {
        if self.phase != BattlePhase::Setup {
            return Err(TurnError::AlreadyStarted { phase: self.phase });
        }
        info!(
            target: "battle::turn",
            seed = self.state.seed,
            enemies = self.state.enemies().len(),
            board = self.state.board().is_some(),
            "battle started"
        );

        let mut log = Vec::new();
        self.enter_player_turn(&mut log);
        Ok(self.turn_report(log, Vec::new()))
    }

    /// Resolves a player action.
    ///
    /// Rejections leave the state untouched. On success the strike, every
    /// chain and every hook follow-up have fully resolved and the terminal
    /// check has run.
    pub fn declare_action(
        &mut self,
        action: &ActionDeclaration,
    ) -> Result<ActionReport, ActionRejected> {
        let cost = match self.validate(action) {
            Ok(cost) => cost,
            Err(rejection) => {
                warn!(
                    target: "battle::turn",
                    target_id = %action.target,
                    code = rejection.error_code(),
                    "action rejected: {rejection}"
                );
                return Err(rejection);
            }
        };

        self.state.resources.energy -= cost;
        if action.block_gain > 0 {
            let player = self.state.player_mut();
            player.block = player.block.saturating_add(action.block_gain);
        }

        let mut events = Vec::new();
        let strike = action.strikes().then(|| {
            let kind = if action.true_damage {
                DamageKind::True
            } else {
                DamageKind::Normal
            };
            let strike = Strike {
                attacker: CombatantId::PLAYER,
                defender: action.target,
                element: action.element,
                base_damage: action.base_damage,
            };
            execute_strike(
                &strike,
                kind,
                &mut self.state,
                &self.config,
                self.rng.as_ref(),
                &mut events,
            )
        });

        debug!(
            target: "battle::turn",
            target_id = %action.target,
            cost,
            energy = self.state.resources.energy,
            damage = strike.as_ref().map_or(0, |report| report.total_health_lost()),
            "action resolved"
        );

        let mut log = Vec::new();
        self.settle(events, &mut log);
        let phase = self.check_terminal();

        Ok(ActionReport {
            energy_spent: cost,
            strike,
            events: log,
            phase,
        })
    }

    /// Ends the player turn, runs the enemy turn and, unless the battle
    /// ended, enters the next player turn.
    pub fn end_turn(&mut self) -> Result<TurnReport, TurnError> {
        if self.phase != BattlePhase::PlayerTurn {
            let rejection = ActionRejected::for_phase(self.phase);
            warn!(target: "battle::turn", "end turn rejected: {rejection}");
            return Err(rejection.into());
        }

        let mut log = Vec::new();
        self.state.resources.cost_modifier = 0;
        self.settle(
            vec![BattleEvent::TurnEnded {
                side: Side::Player,
                turn: self.turn,
            }],
            &mut log,
        );
        if self.check_terminal().is_terminal() {
            return Ok(self.turn_report(log, Vec::new()));
        }

        let skipped = self.run_enemy_turn(&mut log);
        if !self.phase.is_terminal() {
            self.enter_player_turn(&mut log);
        }
        Ok(self.turn_report(log, skipped))
    }

    /// Applies the terminal conditions and returns the resulting phase.
    ///
    /// Does nothing before the battle starts or after it ends. Victory is
    /// checked before defeat.
    pub fn check_terminal(&mut self) -> BattlePhase {
        if !self.phase.is_running() {
            return self.phase;
        }
        if self.state.all_enemies_defeated() {
            self.set_phase(BattlePhase::Victory);
            self.observer.on_victory();
        } else if self.state.player_defeated() {
            self.set_phase(BattlePhase::Defeat);
            self.observer.on_defeat();
        }
        self.phase
    }

    fn validate(&self, action: &ActionDeclaration) -> Result<u32, ActionRejected> {
        if self.phase != BattlePhase::PlayerTurn {
            return Err(ActionRejected::for_phase(self.phase));
        }
        let target = self
            .state
            .combatant(action.target)
            .ok_or(ActionRejected::TargetNotFound(action.target))?;
        if !target.is_alive() {
            return Err(ActionRejected::TargetDefeated(action.target));
        }

        let cost = self.state.resources.effective_cost(action.cost);
        let available = self.state.resources.energy;
        if cost > available {
            return Err(ActionRejected::InsufficientEnergy {
                required: cost,
                available,
            });
        }
        Ok(cost)
    }

    fn set_phase(&mut self, phase: BattlePhase) {
        info!(target: "battle::turn", from = %self.phase, to = %phase, turn = self.turn, "phase changed");
        self.phase = phase;
        self.observer.on_phase(phase, self.turn);
    }

    /// Sweeps the dead, then dispatches `pending` to hooks until no follow-ups
    /// remain or the depth limit is reached. Every event ends up in `log`.
    fn settle(&mut self, mut pending: Vec<BattleEvent>, log: &mut Vec<BattleEvent>) {
        pending.extend(self.sweep_defeated());
        let mut depth = 0;

        while !pending.is_empty() {
            if depth > self.config.max_hook_depth {
                warn!(
                    target: "battle::turn",
                    depth,
                    dropped = pending.len(),
                    "hook chain too deep, follow-ups not dispatched"
                );
                log.append(&mut pending);
                break;
            }

            let mut follow_ups = Vec::new();
            for event in &pending {
                follow_ups.extend(self.hooks.dispatch(event, &mut self.state, &self.config));
            }
            log.append(&mut pending);
            follow_ups.extend(self.sweep_defeated());
            pending = follow_ups;
            depth += 1;
        }
    }

    /// Vacates the tiles of newly defeated combatants. Returns one
    /// `CombatantDefeated` per newly fallen unit.
    fn sweep_defeated(&mut self) -> Vec<BattleEvent> {
        let fallen: Vec<CombatantId> = self
            .state
            .combatants()
            .filter(|unit| !unit.is_alive() && !self.defeated.contains(&unit.id))
            .map(|unit| unit.id)
            .collect();

        fallen
            .into_iter()
            .map(|id| {
                self.defeated.insert(id);
                self.state.vacate(id);
                info!(target: "battle::turn", %id, "combatant defeated");
                BattleEvent::CombatantDefeated { id }
            })
            .collect()
    }

    fn turn_report(&self, events: Vec<BattleEvent>, skipped: Vec<CombatantId>) -> TurnReport {
        TurnReport {
            events,
            skipped,
            phase: self.phase,
            turn: self.turn,
        }
    }
}

/// Builder that assembles an engine and its collaborators.
pub struct BattleEngineBuilder {
    state: BattleState,
    config: BattleConfig,
    rng: Box<dyn RngOracle>,
    behaviors: BTreeMap<CombatantId, Box<dyn EnemyBehavior>>,
    hooks: Vec<Arc<dyn BattleHook>>,
    observer: Box<dyn BattleObserver>,
    scheduler: Box<dyn Scheduler>,
}

impl BattleEngineBuilder {
    pub fn new(state: BattleState) -> Self {
        Self {
            state,
            config: BattleConfig::default(),
            rng: Box::new(PcgRng),
            behaviors: BTreeMap::new(),
            hooks: Vec::new(),
            observer: Box::new(NullObserver),
            scheduler: Box::new(ImmediateScheduler),
        }
    }

    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the seed the state was created with.
    pub fn seed(mut self, seed: u64) -> Self {
        self.state.seed = seed;
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Registers the turn behaviour of one enemy, replacing any previous one.
    pub fn behavior(self, id: CombatantId, behavior: impl EnemyBehavior + 'static) -> Self {
        self.boxed_behavior(id, Box::new(behavior))
    }

    pub fn boxed_behavior(mut self, id: CombatantId, behavior: Box<dyn EnemyBehavior>) -> Self {
        self.behaviors.insert(id, behavior);
        self
    }

    pub fn hook(self, hook: impl BattleHook + 'static) -> Self {
        self.shared_hook(Arc::new(hook))
    }

    pub fn shared_hook(mut self, hook: Arc<dyn BattleHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn observer(mut self, observer: impl BattleObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    pub fn build(self) -> BattleEngine {
        BattleEngine {
            state: self.state,
            config: self.config,
            phase: BattlePhase::Setup,
            turn: 0,
            rng: self.rng,
            behaviors: self.behaviors,
            hooks: HookRegistry::new(self.hooks),
            observer: self.observer,
            scheduler: self.scheduler,
            defeated: BTreeSet::new(),
        }
    }
}
