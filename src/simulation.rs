use crate::agent::{Agent, Mode, StepOutcome};
use crate::config::Config;
use crate::error::{Error, GridError, LayoutError};
use crate::grid::Grid;
use crate::layout::Layout;
use crate::step_log::StepLog;
use log::{info, warn};
use std::fmt;

/// Ticks allowed per grid cell when no budget is configured
pub const TICKS_PER_CELL: u64 = 4;

/// Final state of a finished run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub ticks: u64,
    pub mode: Mode,
    pub position: (i32, i32),
    pub advanced: u64,
    pub retraced: u64,
    /// The budget ran out before the agent reached a terminal mode
    pub out_of_budget: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at ({}, {}) after {} ticks ({} advanced, {} retraced){}",
            self.mode,
            self.position.0,
            self.position.1,
            self.ticks,
            self.advanced,
            self.retraced,
            if self.out_of_budget { ", budget spent" } else { "" }
        )
    }
}

/// Driver owning one grid and one agent
pub struct Simulation {
    layout: Layout,
    start: Agent,
    grid: Grid,
    agent: Agent,
    ticks: u64,
    budget: u64,
    advanced: u64,
    retraced: u64,
    step_log: Option<StepLog>,
}

impl Simulation {
    /// Build the grid from `layout` and place `agent` on it
    pub fn new(layout: Layout, agent: Agent) -> Result<Self, GridError> {
        let mut grid = Grid::from_layout(&layout);
        grid.place_agent(&agent)?;
        let budget = TICKS_PER_CELL * (grid.width() as u64) * (grid.height() as u64);

        Ok(Simulation {
            layout,
            start: agent.clone(),
            grid,
            agent,
            ticks: 0,
            budget,
            advanced: 0,
            retraced: 0,
            step_log: None,
        })
    }

    /// Build a run from configuration
    ///
    /// An unreadable layout file falls back to the built-in maze. A layout
    /// with an `S` marker overrides the configured start position.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let layout = match Layout::load(&config.maze.layout_path) {
            Ok(layout) => layout,
            Err(LayoutError::Io { path, source }) => {
                warn!("Could not read {}: {}", path, source);
                warn!("Using the built-in maze");
                Layout::builtin()
            }
            Err(e) => return Err(e.into()),
        };
        Self::with_layout(layout, config)
    }

    /// Build a run on `layout` using the rest of the configuration
    pub fn with_layout(layout: Layout, config: &Config) -> Result<Self, Error> {
        let (x, y) = layout
            .start()
            .unwrap_or((config.agent.start_x, config.agent.start_y));
        let agent = Agent::facing(x, y, config.agent.direction);

        let mut sim = Self::new(layout, agent)?;
        if config.run.tick_budget > 0 {
            sim.budget = config.run.tick_budget;
        }
        if config.logging.enable_step_log {
            sim.step_log = Some(StepLog::new());
        }
        Ok(sim)
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_step_log(mut self) -> Self {
        self.step_log = Some(StepLog::new());
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn step_log(&self) -> Option<&StepLog> {
        self.step_log.as_ref()
    }

    pub fn render(&self) -> String {
        self.grid.render()
    }

    /// True once the agent is terminal or the budget is spent
    pub fn is_finished(&self) -> bool {
        self.agent.is_finished() || self.ticks >= self.budget
    }

    /// Advance the agent by one step
    pub fn tick(&mut self) -> StepOutcome {
        let outcome = self.agent.step(&mut self.grid);
        self.ticks += 1;

        match outcome {
            StepOutcome::Advanced => self.advanced += 1,
            StepOutcome::Retraced => self.retraced += 1,
            StepOutcome::Exited | StepOutcome::Exhausted => {
                let (x, y) = self.agent.position();
                info!("Agent {:?} at ({}, {}) on tick {}", self.agent.mode(), x, y, self.ticks);
            }
            StepOutcome::Halted => {}
        }

        if let Some(step_log) = self.step_log.as_mut() {
            step_log.record(self.ticks, &self.agent, outcome);
        }

        outcome
    }

    /// Tick until finished
    pub fn run(&mut self) -> RunReport {
        while !self.is_finished() {
            self.tick();
        }
        if !self.agent.is_finished() {
            info!("Tick budget of {} spent", self.budget);
        }
        self.report()
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            ticks: self.ticks,
            mode: self.agent.mode(),
            position: self.agent.position(),
            advanced: self.advanced,
            retraced: self.retraced,
            out_of_budget: !self.agent.is_finished() && self.ticks >= self.budget,
        }
    }

    /// Restore the initial grid and agent
    pub fn reset(&mut self) {
        let mut grid = Grid::from_layout(&self.layout);
        // The start was placed successfully on this same layout in `new`
        if grid.place_agent(&self.start).is_ok() {
            self.grid = grid;
            self.agent = self.start.clone();
        }
        self.ticks = 0;
        self.advanced = 0;
        self.retraced = 0;
        if let Some(step_log) = self.step_log.as_mut() {
            step_log.clear();
        }
    }
}
