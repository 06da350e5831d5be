//! The execution engine and suspend/resume controller.

pub mod controller;
pub mod executor;
pub mod step;

pub use controller::{StartResult, WorkflowController};
pub use executor::{Engine, RunResult};
pub use step::{StepError, StepOutcome, StepRunner};
