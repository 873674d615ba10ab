pub mod driver;
pub mod job;
pub mod report;
pub mod workload;

pub use driver::Sim;
pub use job::{JobInstance, JobSpec};
pub use report::SimReport;
pub use workload::{bernoulli_jobs, BernoulliWorkload};
