use log::{debug, warn};

use super::{
    event::{EventLog, SchedEvent},
    metrics::Metrics,
    observer::Observer,
    snapshot::Snapshot,
    state::{CoreId, Job, JobId, JobKey, Priority, SchedState, Ticks},
};
use crate::error::{Result, SchedError};
use crate::scheduler::Policy;

#[derive(Debug)]
enum Lifecycle {
    Created,
    Started(Session),
    ShutDown,
}

#[derive(Debug)]
struct Session {
    state: SchedState,
    metrics: Metrics,
}

#[derive(Debug)]
pub struct SchedulerEngine {
    lifecycle: Lifecycle,
    log: EventLog,
    observer: Observer,
}

impl SchedulerEngine {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Created,
            log: EventLog::default(),
            observer: Observer::new(),
        }
    }

    pub fn started(num_cores: usize, policy: Policy) -> Result<Self> {
        let mut engine = Self::new();
        engine.start(num_cores, policy)?;
        Ok(engine)
    }

    pub fn with_event_log(mut self) -> Self {
        self.log.enable();
        self
    }

    pub fn start(&mut self, num_cores: usize, policy: Policy) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Started(_) => return Err(SchedError::DoubleStart),
            Lifecycle::ShutDown => return Err(SchedError::UseAfterShutdown),
        }
        if num_cores == 0 {
            return Err(SchedError::NoCores);
        }

        debug!("starting {policy} scheduler on {num_cores} cores");
        self.lifecycle = Lifecycle::Started(Session {
            state: SchedState::new(num_cores, policy),
            metrics: Metrics::default(),
        });
        Ok(())
    }

    pub fn job_arrived(
        &mut self,
        id: JobId,
        time: Ticks,
        service_time: Ticks,
        priority: Priority,
    ) -> Result<Option<CoreId>> {
        let (session, log) = self.session()?;
        let core = session.job_arrived(log, id, time, service_time, priority)?;
        self.observe();
        Ok(core)
    }

    pub fn job_completed(
        &mut self,
        core: CoreId,
        job: JobId,
        time: Ticks,
    ) -> Result<Option<JobId>> {
        let (session, log) = self.session()?;
        let next = session.job_completed(log, core, job, time)?;
        self.observe();
        Ok(next)
    }

    pub fn quantum_expired(&mut self, core: CoreId, time: Ticks) -> Result<Option<JobId>> {
        let (session, log) = self.session()?;
        let next = session.quantum_expired(log, core, time)?;
        self.observe();
        Ok(next)
    }

    pub fn average_wait_time(&self) -> Result<f64> {
        self.metrics()?.average_wait_time()
    }

    pub fn average_turnaround_time(&self) -> Result<f64> {
        self.metrics()?.average_turnaround_time()
    }

    pub fn average_response_time(&self) -> Result<f64> {
        self.metrics()?.average_response_time()
    }

    pub fn shutdown(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::ShutDown) {
            Lifecycle::ShutDown => Err(SchedError::UseAfterShutdown),
            Lifecycle::Started(session) => {
                debug!(
                    "shutting down with {} live jobs after {} completions",
                    session.state.jobs.len(),
                    session.metrics.completed
                );
                Ok(())
            }
            Lifecycle::Created => Ok(()),
        }
    }

    pub fn metrics(&self) -> Result<&Metrics> {
        self.session_ref().map(|session| &session.metrics)
    }

    pub fn queue_snapshot(&self) -> Result<Vec<JobId>> {
        self.session_ref().map(|session| session.state.queued_ids())
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        self.session_ref()
            .map(|session| Snapshot::capture(&session.state))
    }

    pub fn policy(&self) -> Result<Policy> {
        self.session_ref().map(|session| session.state.policy)
    }

    pub fn core_count(&self) -> Result<usize> {
        self.session_ref().map(|session| session.state.cores.len())
    }

    pub fn completed_count(&self) -> Result<u64> {
        self.metrics().map(|metrics| metrics.completed)
    }

    pub fn running_job(&self, core: CoreId) -> Result<Option<JobId>> {
        let session = self.session_ref()?;
        session.check_core(core)?;
        Ok(session
            .state
            .running(core)
            .map(|key| session.state.job(key).id))
    }

    pub fn job(&self, id: JobId) -> Result<Option<&Job>> {
        self.session_ref().map(|session| session.state.lookup(id))
    }

    pub fn drain_events(&mut self) -> Vec<SchedEvent> {
        self.log.drain()
    }

    fn session(&mut self) -> Result<(&mut Session, &mut EventLog)> {
        match &mut self.lifecycle {
            Lifecycle::Started(session) => Ok((session, &mut self.log)),
            Lifecycle::Created => Err(SchedError::NotStarted),
            Lifecycle::ShutDown => Err(SchedError::UseAfterShutdown),
        }
    }

    fn session_ref(&self) -> Result<&Session> {
        match &self.lifecycle {
            Lifecycle::Started(session) => Ok(session),
            Lifecycle::Created => Err(SchedError::NotStarted),
            Lifecycle::ShutDown => Err(SchedError::UseAfterShutdown),
        }
    }

    fn observe(&mut self) {
        if cfg!(debug_assertions) {
            if let Lifecycle::Started(session) = &self.lifecycle {
                self.observer.observe(&session.state);
            }
        }
    }
}

impl Default for SchedulerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    fn check_core(&self, core: CoreId) -> Result<()> {
        let cores = self.state.cores.len();
        if core >= cores {
            return Err(SchedError::InvalidCoreId { core, cores });
        }
        Ok(())
    }

    fn job_arrived(
        &mut self,
        log: &mut EventLog,
        id: JobId,
        time: Ticks,
        service_time: Ticks,
        priority: Priority,
    ) -> Result<Option<CoreId>> {
        if service_time <= 0 {
            return Err(SchedError::InvalidServiceTime {
                job: id,
                service_time,
            });
        }
        if self.state.job_keys.contains_key(&id) {
            return Err(SchedError::DuplicateJob(id));
        }

        let key = self.state.create_job(id, time, service_time, priority);

        if let Some(core) = self.state.pick_idle_core() {
            self.dispatch(log, core, key, time);
            return Ok(Some(core));
        }

        let policy = self.state.policy;
        if policy.is_preemptive() {
            if let Some(core) = policy.select_victim(&mut self.state, key, time) {
                self.preempt(log, core, key, time);
                return Ok(Some(core));
            }
        }

        self.enqueue(log, key, time);
        Ok(None)
    }

    fn job_completed(
        &mut self,
        log: &mut EventLog,
        core: CoreId,
        id: JobId,
        time: Ticks,
    ) -> Result<Option<JobId>> {
        self.check_core(core)?;
        let key = self
            .state
            .running(core)
            .ok_or(SchedError::NotRunningOnCore(core))?;
        let running = self.state.job(key).id;
        if running != id {
            return Err(SchedError::WrongJobOnCore {
                core,
                job: id,
                running,
            });
        }

        self.state.clear_core(core);
        if let Some(job) = self.state.release_job(key) {
            self.metrics.record(&job, time);
        }
        log.push(SchedEvent::Completed {
            time,
            job: id,
            core,
        });

        Ok(self.dispatch_next(log, core, time))
    }

    fn quantum_expired(
        &mut self,
        log: &mut EventLog,
        core: CoreId,
        time: Ticks,
    ) -> Result<Option<JobId>> {
        self.check_core(core)?;
        if self.state.policy != Policy::Rr {
            warn!("quantum expiry on core {core} under {}", self.state.policy);
        }

        match self.state.clear_core(core) {
            Some(key) => {
                if self.state.policy.charges_service() {
                    self.state.job_mut(key).charge_run(time);
                }
                self.enqueue(log, key, time);
            }
            None if self.state.queue.is_empty() => return Ok(None),
            None => warn!("quantum expiry on idle core {core}, dispatching queue head"),
        }

        Ok(self.dispatch_next(log, core, time))
    }

    fn dispatch(&mut self, log: &mut EventLog, core: CoreId, key: JobKey, now: Ticks) {
        self.state.set_running(core, key, now);
        let job = self.state.job(key).id;
        debug!("t={now} job {job} -> core {core}");
        log.push(SchedEvent::Dispatched {
            time: now,
            job,
            core,
        });
    }

    fn dispatch_next(&mut self, log: &mut EventLog, core: CoreId, now: Ticks) -> Option<JobId> {
        match self.state.dequeue() {
            Some(key) => {
                self.dispatch(log, core, key, now);
                Some(self.state.job(key).id)
            }
            None => {
                debug!("t={now} core {core} idle");
                log.push(SchedEvent::CoreIdle { time: now, core });
                None
            }
        }
    }

    fn enqueue(&mut self, log: &mut EventLog, key: JobKey, now: Ticks) {
        let rank = self.state.enqueue(key);
        log.push(SchedEvent::Queued {
            time: now,
            job: self.state.job(key).id,
            rank,
        });
    }

    // Victim's remaining time has already been charged by the policy
    fn preempt(&mut self, log: &mut EventLog, core: CoreId, incoming: JobKey, now: Ticks) {
        let Some(victim) = self.state.clear_core(core) else {
            self.dispatch(log, core, incoming, now);
            return;
        };

        let job = self.state.job_mut(victim);
        if job.first_dispatched_at(now) {
            job.response_time = None;
        }
        let victim_id = job.id;
        let by = self.state.job(incoming).id;
        debug!("t={now} job {by} preempts job {victim_id} on core {core}");
        log.push(SchedEvent::Preempted {
            time: now,
            job: victim_id,
            core,
            by,
        });

        self.enqueue(log, victim, now);
        self.dispatch(log, core, incoming, now);
    }
}
