use log::trace;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use super::queue::JobQueue;
use crate::scheduler::Policy;

// Caller-assigned job number
pub type JobId = u64;
pub type CoreId = usize;
pub type Ticks = i64;
pub type Priority = i32;

new_key_type! {
    // Handle into the job arena
    pub struct JobKey;
}

pub type JobArena = SlotMap<JobKey, Job>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Waiting,
    Running(CoreId),
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub state: JobState,
    pub arrival_time: Ticks,
    pub total_service_time: Ticks,
    // Only charged by PSJF; every other policy leaves it at total_service_time
    pub remaining_service_time: Ticks,
    // Lower value = more urgent
    pub priority: Priority,
    pub response_time: Option<Ticks>,
    pub last_dispatch_time: Option<Ticks>,
}

impl Job {
    pub fn new(id: JobId, arrival_time: Ticks, service_time: Ticks, priority: Priority) -> Self {
        Self {
            id,
            state: JobState::Waiting,
            arrival_time,
            total_service_time: service_time,
            remaining_service_time: service_time,
            priority,
            response_time: None,
            last_dispatch_time: None,
        }
    }

    pub fn charge_run(&mut self, now: Ticks) {
        if let Some(since) = self.last_dispatch_time {
            self.remaining_service_time -= now - since;
        }
        self.last_dispatch_time = Some(now);
    }

    // First dispatched at `now` and has not run since
    pub fn first_dispatched_at(&self, now: Ticks) -> bool {
        self.response_time == Some(now - self.arrival_time)
    }
}

#[derive(Debug)]
pub struct CoreSlot {
    pub id: CoreId,
    pub current: Option<JobKey>,
}

#[derive(Debug)]
pub struct SchedState {
    pub policy: Policy,
    pub cores: Vec<CoreSlot>,
    pub jobs: JobArena,
    pub job_keys: FxHashMap<JobId, JobKey>,
    pub queue: JobQueue,
}

impl SchedState {
    pub fn new(num_cores: usize, policy: Policy) -> Self {
        Self {
            policy,
            cores: (0..num_cores)
                .map(|id| CoreSlot { id, current: None })
                .collect(),
            jobs: SlotMap::with_key(),
            job_keys: FxHashMap::default(),
            queue: JobQueue::new(policy),
        }
    }

    pub fn create_job(
        &mut self,
        id: JobId,
        arrival_time: Ticks,
        service_time: Ticks,
        priority: Priority,
    ) -> JobKey {
        debug_assert!(
            !self.job_keys.contains_key(&id),
            "Job {id} already present in the arena"
        );
        let key = self
            .jobs
            .insert(Job::new(id, arrival_time, service_time, priority));
        self.job_keys.insert(id, key);
        key
    }

    pub fn job(&self, key: JobKey) -> &Job {
        &self.jobs[key]
    }

    pub fn job_mut(&mut self, key: JobKey) -> &mut Job {
        &mut self.jobs[key]
    }

    pub fn lookup(&self, id: JobId) -> Option<&Job> {
        self.job_keys.get(&id).map(|&key| &self.jobs[key])
    }

    pub fn running(&self, core: CoreId) -> Option<JobKey> {
        self.cores[core].current
    }

    pub fn pick_idle_core(&self) -> Option<CoreId> {
        self.cores
            .iter()
            .find(|core| core.current.is_none())
            .map(|core| core.id)
    }

    pub fn running_keys(&self) -> impl Iterator<Item = (CoreId, JobKey)> + '_ {
        self.cores
            .iter()
            .filter_map(|core| core.current.map(|key| (core.id, key)))
    }

    pub fn set_running(&mut self, core: CoreId, key: JobKey, now: Ticks) {
        debug_assert!(
            self.cores[core].current.is_none(),
            "Core {core} already running a job"
        );

        self.cores[core].current = Some(key);
        let job = self.job_mut(key);
        debug_assert_eq!(
            job.state,
            JobState::Waiting,
            "Job {} must be waiting before dispatch",
            job.id
        );
        job.state = JobState::Running(core);
        job.last_dispatch_time = Some(now);
        if job.response_time.is_none() {
            job.response_time = Some(now - job.arrival_time);
        }
    }

    pub fn clear_core(&mut self, core: CoreId) -> Option<JobKey> {
        let key = self.cores[core].current.take()?;
        self.job_mut(key).state = JobState::Waiting;
        Some(key)
    }

    // Return rank the job landed at
    pub fn enqueue(&mut self, key: JobKey) -> usize {
        debug_assert_eq!(self.job(key).state, JobState::Waiting);
        let rank = self.queue.insert(key, &self.jobs);
        trace!("job {} queued at rank {rank}", self.jobs[key].id);
        rank
    }

    pub fn dequeue(&mut self) -> Option<JobKey> {
        self.queue.pop_front()
    }

    // Frees the id for reuse
    pub fn release_job(&mut self, key: JobKey) -> Option<Job> {
        let job = self.jobs.remove(key)?;
        self.job_keys.remove(&job.id);
        Some(job)
    }

    pub fn queued_ids(&self) -> Vec<JobId> {
        self.queue.iter().map(|key| self.jobs[key].id).collect()
    }
}
