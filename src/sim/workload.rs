use rand::prelude::*;

use super::job::JobSpec;
use crate::core::{Priority, Ticks};

// Each tick a job arrives with probability `p_arrival`
#[derive(Debug, Clone)]
pub struct BernoulliWorkload {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    // Priorities are drawn uniformly from 0..=max_priority
    pub max_priority: Priority,
    pub seed: u64,
}

impl Default for BernoulliWorkload {
    fn default() -> Self {
        Self {
            ticks: 500,
            p_arrival: 0.3,
            p_short: 0.3,
            short_ticks: 2,
            long_ticks: 6,
            max_priority: 4,
            seed: 0,
        }
    }
}

pub fn bernoulli_jobs(shape: &BernoulliWorkload) -> Vec<JobSpec> {
    let mut rng = StdRng::seed_from_u64(shape.seed);
    let mut jobs = Vec::new();

    for t in 0..shape.ticks {
        if rng.random::<f64>() < shape.p_arrival {
            let service_time = if rng.random::<f64>() < shape.p_short {
                shape.short_ticks
            } else {
                shape.long_ticks
            };
            let priority = rng.random_range(0..=shape.max_priority);

            jobs.push(JobSpec::new(jobs.len() as u64, t, service_time).with_priority(priority));
        }
    }

    jobs
}
