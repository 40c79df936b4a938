pub mod agent;
pub mod cell;
pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod layout;
pub mod simulation;
pub mod step_log;

pub use agent::{Agent, Mode, MoveResult, StepOutcome};
pub use cell::Cell;
pub use config::Config;
pub use direction::Direction;
pub use error::{Error, GridError, LayoutError};
pub use grid::Grid;
pub use layout::Layout;
pub use simulation::{RunReport, Simulation};
pub use step_log::StepLog;
