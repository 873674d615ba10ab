use super::state::{JobState, SchedState};

// Only active in debug builds
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn observe(&mut self, state: &SchedState) {
        self.step += 1;

        for core in &state.cores {
            if let Some(key) = core.current {
                let job = state.job(key);
                debug_assert_eq!(
                    job.state,
                    JobState::Running(core.id),
                    "core {} runs job {} whose state disagrees",
                    core.id,
                    job.id
                );
                debug_assert!(
                    !state.queue.contains(key),
                    "running job {} must not appear in the queue",
                    job.id
                );
            }
        }

        for key in state.queue.iter() {
            let job = state.job(key);
            debug_assert_eq!(
                job.state,
                JobState::Waiting,
                "queued job {} must be waiting",
                job.id
            );
        }

        let running = state.running_keys().count();
        debug_assert_eq!(
            running + state.queue.size(),
            state.jobs.len(),
            "every live job is either running or queued (step {})",
            self.step
        );
        debug_assert_eq!(state.jobs.len(), state.job_keys.len());
        debug_assert!(
            state.queue.is_sorted(&state.jobs),
            "queue out of {} order at step {}",
            state.policy,
            self.step
        );
    }
}
