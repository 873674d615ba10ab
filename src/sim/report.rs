use std::fmt;

use average::{Estimate, Mean};
use serde::Serialize;

use super::driver::Sim;
use super::job::JobInstance;
use crate::core::Ticks;
use crate::error::Result;
use crate::scheduler::Policy;

#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub policy: Policy,
    pub cores: usize,
    pub jobs: usize,
    pub makespan: Ticks,
    pub average_wait_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    pub observed_wait_time: f64,
    pub observed_turnaround_time: f64,
    pub observed_response_time: f64,
    pub average_service_time: f64,
    pub max_requeues: u32,
}

impl SimReport {
    pub fn collect(sim: &Sim) -> Result<Self> {
        let engine = &sim.engine;
        let config = sim.config();

        Ok(Self {
            policy: config.policy,
            cores: config.cores,
            jobs: sim.jobs.len(),
            makespan: sim
                .jobs_map(|j| j.completion_time.unwrap_or_default())
                .max()
                .unwrap_or_default(),
            average_wait_time: engine.average_wait_time()?,
            average_turnaround_time: engine.average_turnaround_time()?,
            average_response_time: engine.average_response_time()?,
            observed_wait_time: avg(sim, JobInstance::wait_time),
            observed_turnaround_time: avg(sim, JobInstance::turnaround_time),
            observed_response_time: avg(sim, JobInstance::response_time),
            average_service_time: avg(sim, |j| Some(j.job.service_time)),
            max_requeues: sim.jobs_map(|j| j.requeues).max().unwrap_or_default(),
        })
    }
}

fn avg<F>(sim: &Sim, metric: F) -> f64
where
    F: Fn(&JobInstance) -> Option<Ticks>,
{
    sim.jobs
        .iter()
        .filter_map(metric)
        .map(|t| t as f64)
        .collect::<Mean>()
        .estimate()
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} on {} cores, {} jobs, makespan {} ticks",
            self.policy, self.cores, self.jobs, self.makespan
        )?;
        writeln!(f, "Average waiting time: {:.2}", self.average_wait_time)?;
        writeln!(
            f,
            "Average turnaround time: {:.2}",
            self.average_turnaround_time
        )?;
        write!(f, "Average response time: {:.2}", self.average_response_time)
    }
}
