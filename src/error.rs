use thiserror::Error;

use crate::core::{CoreId, JobId, Ticks};

pub type Result<T> = std::result::Result<T, SchedError>;

// A call failing with one of these leaves the scheduler state untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedError {
    #[error("core {core} is out of range (scheduler has {cores} cores)")]
    InvalidCoreId { core: CoreId, cores: usize },

    #[error("no job is running on core {0}")]
    NotRunningOnCore(CoreId),

    #[error("job {job} is not running on core {core} (core runs job {running})")]
    WrongJobOnCore {
        core: CoreId,
        job: JobId,
        running: JobId,
    },

    #[error("no jobs have completed yet")]
    NoCompletedJobs,

    #[error("scheduler was already started")]
    DoubleStart,

    #[error("scheduler has been shut down")]
    UseAfterShutdown,

    #[error("scheduler has not been started")]
    NotStarted,

    #[error("scheduler needs at least one core")]
    NoCores,

    #[error("job {job} has non-positive service time {service_time}")]
    InvalidServiceTime { job: JobId, service_time: Ticks },

    #[error("job {0} is already live in the scheduler")]
    DuplicateJob(JobId),

    #[error("unknown scheduling policy `{0}`")]
    UnknownPolicy(String),

    #[error("round-robin needs a positive quantum")]
    MissingQuantum,

    #[error("simulation stalled at t={time} with {pending} unfinished jobs")]
    Stalled { time: Ticks, pending: usize },
}
