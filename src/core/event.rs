use serde::Serialize;

use crate::core::{CoreId, JobId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SchedEvent {
    Dispatched {
        time: Ticks,
        job: JobId,
        core: CoreId,
    },
    Preempted {
        time: Ticks,
        job: JobId,
        core: CoreId,
        by: JobId,
    },
    // Job entered the waiting queue at `rank`
    Queued {
        time: Ticks,
        job: JobId,
        rank: usize,
    },
    Completed {
        time: Ticks,
        job: JobId,
        core: CoreId,
    },
    // Core has nothing left to run
    CoreIdle {
        time: Ticks,
        core: CoreId,
    },
}

#[derive(Debug, Default)]
pub struct EventLog {
    enabled: bool,
    events: Vec<SchedEvent>,
}

impl EventLog {
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn push(&mut self, event: SchedEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn drain(&mut self) -> Vec<SchedEvent> {
        std::mem::take(&mut self.events)
    }
}
