use log::debug;
use serde::Serialize;

use super::state::{Job, Ticks};
use crate::error::{Result, SchedError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub wait_time: Ticks,
    pub turnaround_time: Ticks,
    pub response_time: Ticks,
    pub completed: u64,
}

impl Metrics {
    pub fn record(&mut self, job: &Job, now: Ticks) {
        let turnaround = now - job.arrival_time;
        let wait = turnaround - job.total_service_time;
        debug_assert!(
            job.response_time.is_some(),
            "Job {} completed without ever being dispatched",
            job.id
        );
        let response = job.response_time.unwrap_or_default();

        self.wait_time += wait;
        self.turnaround_time += turnaround;
        self.response_time += response;
        self.completed += 1;
        debug!(
            "job {} done at t={now}: wait={wait} turnaround={turnaround} response={response}",
            job.id
        );
    }

    pub fn average_wait_time(&self) -> Result<f64> {
        self.average(self.wait_time)
    }

    pub fn average_turnaround_time(&self) -> Result<f64> {
        self.average(self.turnaround_time)
    }

    pub fn average_response_time(&self) -> Result<f64> {
        self.average(self.response_time)
    }

    fn average(&self, sum: Ticks) -> Result<f64> {
        if self.completed == 0 {
            return Err(SchedError::NoCompletedJobs);
        }
        Ok(sum as f64 / self.completed as f64)
    }
}
