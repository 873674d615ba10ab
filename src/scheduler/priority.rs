use std::cmp::Ordering;

use log::trace;

use crate::core::{CoreId, Job, Priority, SchedState};

pub fn compare(a: &Job, b: &Job) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.arrival_time.cmp(&b.arrival_time))
}

// Later arrival, then lowest core id, wins ties
pub fn least_urgent(state: &SchedState) -> Option<(CoreId, Priority)> {
    state
        .running_keys()
        .fold(None::<(CoreId, &Job)>, |best, (core, key)| {
            let job = state.job(key);
            match best {
                Some((_, current))
                    if (job.priority, job.arrival_time)
                        <= (current.priority, current.arrival_time) =>
                {
                    best
                }
                _ => Some((core, job)),
            }
        })
        .map(|(core, job)| (core, job.priority))
}

pub fn select_victim(state: &mut SchedState, priority: Priority) -> Option<CoreId> {
    let (core, least) = least_urgent(state)?;
    trace!("ppri: least urgent priority {least} on core {core}, incoming {priority}");
    (priority < least).then_some(core)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Ticks;
    use crate::scheduler::Policy;

    fn running(jobs: &[(u64, Ticks, Priority)]) -> SchedState {
        let mut state = SchedState::new(jobs.len(), Policy::Ppri);
        for (core, &(id, arrival, priority)) in jobs.iter().enumerate() {
            let key = state.create_job(id, arrival, 10, priority);
            state.set_running(core, key, arrival);
        }
        state
    }

    #[test]
    fn test_compare_priority_then_arrival() {
        let urgent = Job::new(1, 5, 10, 0);
        let lazy = Job::new(2, 0, 1, 4);
        let lazy_later = Job::new(3, 2, 1, 4);
        assert_eq!(compare(&urgent, &lazy), Ordering::Less);
        assert_eq!(compare(&lazy, &lazy_later), Ordering::Less);
    }

    #[test]
    fn test_least_urgent_prefers_later_arrival_on_tie() {
        let state = running(&[(1, 0, 3), (2, 4, 3), (3, 1, 3), (4, 2, 1)]);
        assert_eq!(least_urgent(&state), Some((1, 3)));
    }

    #[test]
    fn test_least_urgent_is_numerically_highest() {
        let state = running(&[(1, 0, 2), (2, 1, 7), (3, 2, 5)]);
        assert_eq!(least_urgent(&state), Some((1, 7)));
    }

    #[test]
    fn test_preempts_only_when_strictly_more_urgent() {
        let mut state = running(&[(1, 0, 2), (2, 1, 5)]);
        assert_eq!(select_victim(&mut state, 5), None);
        assert_eq!(select_victim(&mut state, 4), Some(1));
        assert_eq!(select_victim(&mut state, 1), Some(1));
    }

    #[test]
    fn test_remaining_time_is_never_charged() {
        let mut state = running(&[(1, 0, 5)]);
        select_victim(&mut state, 0);
        let key = state.running(0).unwrap();
        assert_eq!(state.job(key).remaining_service_time, 10);
    }
}
