//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the battle engine; everything else talks to it
//! through commands.

mod simulation;

pub use simulation::{Command, SimulationWorker};
