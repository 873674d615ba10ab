pub mod priority;
pub mod shortest;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{CoreId, Job, JobKey, SchedState, Ticks};
use crate::error::SchedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Fcfs,
    Sjf,
    Psjf,
    Pri,
    Ppri,
    // Quantum enforced by the driver
    Rr,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Policy::Fcfs,
        Policy::Sjf,
        Policy::Psjf,
        Policy::Pri,
        Policy::Ppri,
        Policy::Rr,
    ];

    // FCFS and RR compare Equal, so insertion order stands
    pub fn compare(&self, a: &Job, b: &Job) -> Ordering {
        match self {
            Policy::Fcfs | Policy::Rr => Ordering::Equal,
            Policy::Sjf | Policy::Psjf => shortest::compare(a, b),
            Policy::Pri | Policy::Ppri => priority::compare(a, b),
        }
    }

    pub fn is_preemptive(&self) -> bool {
        matches!(self, Policy::Psjf | Policy::Ppri)
    }

    pub fn charges_service(&self) -> bool {
        matches!(self, Policy::Psjf)
    }

    // PSJF charges every running job as a side effect
    pub fn select_victim(
        &self,
        state: &mut SchedState,
        incoming: JobKey,
        now: Ticks,
    ) -> Option<CoreId> {
        match self {
            Policy::Psjf => {
                let service_time = state.job(incoming).total_service_time;
                shortest::select_victim(state, service_time, now)
            }
            Policy::Ppri => {
                let priority = state.job(incoming).priority;
                priority::select_victim(state, priority)
            }
            Policy::Fcfs | Policy::Sjf | Policy::Pri | Policy::Rr => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::Psjf => "PSJF",
            Policy::Pri => "PRI",
            Policy::Ppri => "PPRI",
            Policy::Rr => "RR",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchedError::UnknownPolicy(s.to_string()))
    }
}
