use serde::{Deserialize, Serialize};

use crate::core::Ticks;
use crate::error::{Result, SchedError};
use crate::scheduler::Policy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub cores: usize,
    pub policy: Policy,
    #[serde(default)]
    pub quantum: Option<Ticks>,
}

impl SimConfig {
    pub fn new(cores: usize, policy: Policy) -> Self {
        Self {
            cores,
            policy,
            quantum: None,
        }
    }

    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cores == 0 {
            return Err(SchedError::NoCores);
        }
        if self.policy == Policy::Rr && !self.quantum.is_some_and(|q| q > 0) {
            return Err(SchedError::MissingQuantum);
        }
        Ok(())
    }

    pub fn active_quantum(&self) -> Option<Ticks> {
        match self.policy {
            Policy::Rr => self.quantum,
            _ => None,
        }
    }
}
