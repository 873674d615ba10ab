use serde::{Deserialize, Serialize};

use crate::core::{JobId, Priority, Ticks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    #[serde(default)]
    pub priority: Priority,
}

impl JobSpec {
    pub fn new(id: JobId, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

// Observed independently of the engine
#[derive(Debug, Clone, Serialize)]
pub struct JobInstance {
    pub job: JobSpec,
    // Actual work still owed
    pub remaining: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    // Times the job went back to the queue while unfinished
    pub requeues: u32,
}

impl JobInstance {
    pub fn new(job: JobSpec) -> Self {
        Self {
            remaining: job.service_time,
            job,
            start_time: None,
            completion_time: None,
            requeues: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.start_time.map(|start| start - self.job.arrival_time)
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time
            .map(|done| done - self.job.arrival_time)
    }

    pub fn wait_time(&self) -> Option<Ticks> {
        self.turnaround_time()
            .map(|turnaround| turnaround - self.job.service_time)
    }
}
