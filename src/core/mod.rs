pub mod engine;
pub mod event;
pub mod metrics;
pub mod observer;
pub mod queue;
pub mod snapshot;
pub mod state;

pub use engine::SchedulerEngine;
pub use event::{EventLog, SchedEvent};
pub use metrics::Metrics;
pub use queue::JobQueue;
pub use snapshot::{Snapshot, SnapshotEntry};
pub use state::{
    CoreId, CoreSlot, Job, JobArena, JobId, JobKey, JobState, Priority, SchedState, Ticks,
};
