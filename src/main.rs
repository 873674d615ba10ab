use cpusched::sim::{bernoulli_jobs, BernoulliWorkload};
use cpusched::{Policy, SchedEvent, Sim, SimConfig, SimReport};
use log::{debug, info};

const NUM_CORES: usize = 2;
const QUANTUM: i64 = 3;

fn main() -> cpusched::Result<()> {
    env_logger::init();

    let jobs = bernoulli_jobs(&BernoulliWorkload::default());
    info!("generated {} jobs", jobs.len());

    for policy in Policy::ALL {
        let config = SimConfig::new(NUM_CORES, policy).with_quantum(QUANTUM);
        let mut sim = Sim::new(config, jobs.clone())?;

        let mut idle_events = 0;
        while !sim.all_jobs_completed() {
            let events = sim.advance()?;
            let now = sim.now();
            for event in events {
                debug!("t={now} {event:?}");
                if let SchedEvent::CoreIdle { .. } = event {
                    idle_events += 1;
                }
            }
        }

        let report = SimReport::collect(&sim)?;
        println!("{report}");
        println!("Core idle events: {idle_events}");
        println!("Most requeues of a single job: {}\n", report.max_requeues);
        sim.engine.shutdown()?;
    }

    Ok(())
}
