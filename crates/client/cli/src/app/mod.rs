//! Glue code tying content loading, the battle engine and the script
//! together.
use std::time::Duration;

use anyhow::Result;
use battle_content::{ContentFactory, ScenarioSpec};
use battle_core::{ActionRejected, BattleEngine, BattleEvent};

use crate::Cli;
use crate::pacing::PacedScheduler;
use crate::presentation::{LogObserver, describe, summary};

pub struct SimApp {
    cli: Cli,
}

impl SimApp {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn run(self) -> Result<()> {
        let factory = ContentFactory::new(&self.cli.data_dir);

        if self.cli.list {
            for name in factory.scenario_names()? {
                println!("{}", name);
            }
            return Ok(());
        }

        let config = factory.load_config()?;
        let spec = factory.load_scenario(&self.cli.scenario)?;
        let mut builder = spec
            .engine_builder(config)?
            .observer(LogObserver)
            .scheduler(PacedScheduler::new(Duration::from_millis(self.cli.pace_ms)));
        if let Some(seed) = self.cli.seed {
            builder = builder.seed(seed);
        }
        let mut engine = builder.build();

        tracing::info!(scenario = %spec.name, "Simulation starting...");
        let report = engine.start()?;
        self.print_events(&report.events);

        let mut script = Script::new(&spec);
        while !engine.is_over() && engine.turn() <= self.cli.max_turns {
            script.play_turn(&mut engine, |events| self.print_events(events))?;
            if engine.is_over() {
                break;
            }
            let report = engine.end_turn()?;
            self.print_events(&report.events);
            for id in &report.skipped {
                tracing::info!("{} could not act", id);
            }
        }

        if !engine.is_over() {
            tracing::warn!(max_turns = self.cli.max_turns, "turn limit reached");
        }
        println!(
            "{}",
            summary(&spec.name, engine.phase(), engine.turn(), engine.state())
        );
        Ok(())
    }

    fn print_events(&self, events: &[BattleEvent]) {
        if self.cli.verbose {
            for event in events {
                println!("  {}", describe(event));
            }
        }
    }
}

/// Replays the scenario's scripted actions, resuming where the previous turn
/// stopped.
struct Script<'a> {
    spec: &'a ScenarioSpec,
    cursor: usize,
}

impl<'a> Script<'a> {
    fn new(spec: &'a ScenarioSpec) -> Self {
        Self { spec, cursor: 0 }
    }

    /// Plays actions until energy runs out, the battle ends or every scripted
    /// action has been tried once this turn.
    fn play_turn(
        &mut self,
        engine: &mut BattleEngine,
        mut on_events: impl FnMut(&[BattleEvent]),
    ) -> Result<()> {
        let actions = &self.spec.actions;
        for _ in 0..actions.len() {
            let scripted = &actions[self.cursor % actions.len()];
            let Some(declaration) = scripted.declaration(engine.state()) else {
                return Ok(());
            };

            match engine.declare_action(&declaration) {
                Ok(report) => on_events(&report.events),
                Err(ActionRejected::InsufficientEnergy { .. }) => return Ok(()),
                Err(
                    rejection @ (ActionRejected::TargetDefeated(_)
                    | ActionRejected::TargetNotFound(_)),
                ) => tracing::info!("skipping scripted action: {}", rejection),
                Err(rejection) => return Err(rejection.into()),
            }

            self.cursor += 1;
            if engine.is_over() {
                break;
            }
        }
        Ok(())
    }
}
