pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::config::SimConfig;
pub use crate::core::{SchedEvent, SchedulerEngine};
pub use crate::error::{Result, SchedError};
pub use crate::scheduler::Policy;
pub use crate::sim::{JobSpec, Sim, SimReport};
