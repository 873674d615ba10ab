use std::cmp::Ordering;

use log::trace;

use crate::core::{CoreId, Job, SchedState, Ticks};

pub fn compare(a: &Job, b: &Job) -> Ordering {
    a.remaining_service_time
        .cmp(&b.remaining_service_time)
        .then_with(|| a.arrival_time.cmp(&b.arrival_time))
}

pub fn charge_elapsed(state: &mut SchedState, now: Ticks) {
    let running: Vec<_> = state.running_keys().map(|(_, key)| key).collect();
    for key in running {
        state.job_mut(key).charge_run(now);
    }
}

// Lowest core id wins ties
pub fn longest_remaining(state: &SchedState) -> Option<(CoreId, Ticks)> {
    state
        .running_keys()
        .map(|(core, key)| (core, state.job(key).remaining_service_time))
        .fold(None, |best, (core, remaining)| match best {
            Some((_, longest)) if remaining <= longest => best,
            _ => Some((core, remaining)),
        })
}

pub fn select_victim(state: &mut SchedState, service_time: Ticks, now: Ticks) -> Option<CoreId> {
    charge_elapsed(state, now);
    let (core, longest) = longest_remaining(state)?;
    trace!("psjf: longest remaining {longest} on core {core}, incoming {service_time}");
    (service_time < longest).then_some(core)
}
