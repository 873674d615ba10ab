use std::fmt;

use serde::Serialize;

use super::state::{CoreId, JobId, SchedState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub job: JobId,
    // None while the job waits in the queue
    pub core: Option<CoreId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn capture(state: &SchedState) -> Self {
        let running = state.running_keys().map(|(core, key)| SnapshotEntry {
            job: state.job(key).id,
            core: Some(core),
        });
        let waiting = state.queue.iter().map(|key| SnapshotEntry {
            job: state.job(key).id,
            core: None,
        });
        Self {
            entries: running.chain(waiting).collect(),
        }
    }

    pub fn waiting(&self) -> impl Iterator<Item = JobId> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.core.is_none())
            .map(|entry| entry.job)
    }
}

// e.g. `4(0) 2(-1) 1(-1)`
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match entry.core {
                Some(core) => write!(f, "{}({core})", entry.job)?,
                None => write!(f, "{}(-1)", entry.job)?,
            }
        }
        Ok(())
    }
}
