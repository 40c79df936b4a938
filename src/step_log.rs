use crate::agent::{Agent, Mode, StepOutcome};
use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One logged tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub tick: u64,
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub mode: Mode,
    pub outcome: StepOutcome,
}

/// Per-tick trace of a run
pub struct StepLog {
    start_time: Instant,
    records: Vec<StepRecord>,
}

impl StepLog {
    pub fn new() -> Self {
        StepLog {
            start_time: Instant::now(),
            records: Vec::new(),
        }
    }

    /// Record the agent's state right after a tick
    pub fn record(&mut self, tick: u64, agent: &Agent, outcome: StepOutcome) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        let (x, y) = agent.position();

        self.records.push(StepRecord {
            tick,
            timestamp_ms,
            x,
            y,
            direction: agent.direction(),
            mode: agent.mode(),
            outcome,
        });
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.start_time = Instant::now();
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut advanced = 0;
        let mut retraced = 0;
        let mut halted = 0;

        for record in &self.records {
            match record.outcome {
                StepOutcome::Advanced => advanced += 1,
                StepOutcome::Retraced => retraced += 1,
                StepOutcome::Halted => halted += 1,
                StepOutcome::Exited | StepOutcome::Exhausted => {}
            }
        }

        let duration = self.records.last().map_or(0, |last| last.timestamp_ms);
        let ending = self
            .records
            .iter()
            .rev()
            .find_map(|r| match r.outcome {
                StepOutcome::Exited => Some("exited"),
                StepOutcome::Exhausted => Some("exhausted"),
                _ => None,
            })
            .unwrap_or("running");

        format!(
            "Run Duration: {}ms\n\
             Total Ticks: {} ({})\n\
             Moves: {} advanced, {} retraced, {} idle",
            duration,
            self.records.len(),
            ending,
            advanced,
            retraced,
            halted
        )
    }
}

impl Default for StepLog {
    fn default() -> Self {
        Self::new()
    }
}
