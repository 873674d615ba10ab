use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use super::job::{JobInstance, JobSpec};
use super::report::SimReport;
use crate::config::SimConfig;
use crate::core::{CoreId, JobId, SchedEvent, SchedulerEngine, Ticks};
use crate::error::{Result, SchedError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TimerKind {
    Completion,
    QuantumExpiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    time: Ticks,
    core: CoreId,
    kind: TimerKind,
}

// KeyedPriorityQueue is a max-heap, so flip the order: earliest time first,
// then lowest core
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.core.cmp(&self.core))
            .then_with(|| other.kind.cmp(&self.kind))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    slot: usize,
    dispatched_at: Ticks,
}

// Timers due now fire in core order, then arrivals in (arrival, id) order
pub struct Sim {
    pub engine: SchedulerEngine,
    pub jobs: Vec<JobInstance>,
    config: SimConfig,
    now: Ticks,
    job_cursor: usize,
    // JobId --> jobs[index]; filled as jobs arrive
    slots: FxHashMap<JobId, usize>,
    cores: Vec<Option<Run>>,
    // At most one pending timer per core
    timers: KeyedPriorityQueue<CoreId, Timer>,
}

impl Sim {
    pub fn new(config: SimConfig, mut jobs: Vec<JobSpec>) -> Result<Self> {
        config.validate()?;
        jobs.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut engine = SchedulerEngine::new().with_event_log();
        engine.start(config.cores, config.policy)?;

        Ok(Self {
            engine,
            jobs: jobs.into_iter().map(JobInstance::new).collect(),
            now: 0,
            job_cursor: 0,
            slots: FxHashMap::default(),
            cores: vec![None; config.cores],
            timers: KeyedPriorityQueue::new(),
            config,
        })
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn next_time(&self) -> Option<Ticks> {
        let arrival = self
            .jobs
            .get(self.job_cursor)
            .map(|instance| instance.job.arrival_time);
        let timer = self.timers.peek().map(|(_, timer)| timer.time);

        match (arrival, timer) {
            (Some(a), Some(t)) => Some(a.min(t)),
            (a, t) => a.or(t),
        }
    }

    pub fn step(&mut self) -> Result<Vec<SchedEvent>> {
        let Some(now) = self.next_time() else {
            return Ok(Vec::new());
        };
        self.now = now;

        while let Some((&core, &timer)) = self.timers.peek() {
            if timer.time > now {
                break;
            }
            self.timers.pop();
            if let Err(err) = self.fire(core, timer.kind) {
                self.timers.push(core, timer);
                return Err(err);
            }
        }

        self.handle_arrivals()?;
        Ok(self.engine.drain_events())
    }

    // Like `step`, but fails when jobs are still pending and nothing is due
    pub fn advance(&mut self) -> Result<Vec<SchedEvent>> {
        if self.next_time().is_none() && !self.all_jobs_completed() {
            return Err(SchedError::Stalled {
                time: self.now,
                pending: self.pending(),
            });
        }
        self.step()
    }

    pub fn run(&mut self) -> Result<SimReport> {
        while !self.all_jobs_completed() {
            self.advance()?;
        }
        SimReport::collect(self)
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.jobs.iter().all(JobInstance::is_completed)
    }

    fn pending(&self) -> usize {
        self.jobs.iter().filter(|j| !j.is_completed()).count()
    }

    pub fn jobs_map<'a, T, F>(&'a self, f: F) -> impl Iterator<Item = T> + 'a
    where
        F: Fn(&JobInstance) -> T + 'a,
    {
        self.jobs.iter().map(f)
    }

    // Simulator state only changes once the engine has accepted the event
    fn fire(&mut self, core: CoreId, kind: TimerKind) -> Result<()> {
        let now = self.now;
        let Some(run) = self.cores[core] else {
            warn!("timer fired on idle core {core} at t={now}");
            return Ok(());
        };

        let id = self.jobs[run.slot].job.id;
        let next = match kind {
            TimerKind::Completion => self.engine.job_completed(core, id, now)?,
            TimerKind::QuantumExpiry => self.engine.quantum_expired(core, now)?,
        };

        self.cores[core] = None;
        let instance = &mut self.jobs[run.slot];
        instance.remaining -= now - run.dispatched_at;
        match kind {
            TimerKind::Completion => {
                debug_assert_eq!(instance.remaining, 0, "job {id} completed early");
                instance.completion_time = Some(now);
            }
            TimerKind::QuantumExpiry => instance.requeues += 1,
        }

        if let Some(next) = next {
            self.dispatch(core, next);
        }
        Ok(())
    }

    fn handle_arrivals(&mut self) -> Result<()> {
        let now = self.now;
        while let Some(instance) = self.jobs.get(self.job_cursor) {
            if instance.job.arrival_time > now {
                break;
            }
            let job = instance.job.clone();
            let placed = self
                .engine
                .job_arrived(job.id, now, job.service_time, job.priority)?;

            self.slots.insert(job.id, self.job_cursor);
            self.job_cursor += 1;
            if let Some(core) = placed {
                if let Some(run) = self.cores[core].take() {
                    self.preempted(run);
                }
                self.dispatch(core, job.id);
            }
        }
        Ok(())
    }

    fn preempted(&mut self, run: Run) {
        let now = self.now;
        let instance = &mut self.jobs[run.slot];
        instance.remaining -= now - run.dispatched_at;
        instance.requeues += 1;
        // A job displaced the instant it was placed never really started
        if run.dispatched_at == now && instance.start_time == Some(now) {
            instance.start_time = None;
        }
        debug!(
            "t={now} job {} preempted with {} left",
            instance.job.id, instance.remaining
        );
    }

    fn dispatch(&mut self, core: CoreId, id: JobId) {
        let Some(&slot) = self.slots.get(&id) else {
            warn!("engine dispatched unknown job {id} on core {core}");
            return;
        };

        let now = self.now;
        let instance = &mut self.jobs[slot];
        instance.start_time.get_or_insert(now);

        let timer = match self.config.active_quantum() {
            Some(quantum) if quantum < instance.remaining => Timer {
                time: now + quantum,
                core,
                kind: TimerKind::QuantumExpiry,
            },
            _ => Timer {
                time: now + instance.remaining,
                core,
                kind: TimerKind::Completion,
            },
        };

        self.cores[core] = Some(Run {
            slot,
            dispatched_at: now,
        });
        self.timers.push(core, timer);
    }
}
