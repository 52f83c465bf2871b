pub mod core;
pub mod error;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod sim;

pub use error::{ConfigError, DataError, SimError};
pub use scheduler::Scheduler;
pub use sim::{Batch, Mode, Outcome, Policy, PolicySpec, ProcessSpec, Sim, Workload, simulate};
