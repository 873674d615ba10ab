use std::cmp::Ordering;
use std::collections::VecDeque;

use super::state::{JobArena, JobKey};
use crate::scheduler::Policy;

#[derive(Debug)]
pub struct JobQueue {
    policy: Policy,
    jobs: VecDeque<JobKey>,
}

impl JobQueue {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            jobs: VecDeque::new(),
        }
    }

    // Returns the zero-based rank
    pub fn insert(&mut self, key: JobKey, arena: &JobArena) -> usize {
        debug_assert!(!self.contains(key), "Job already present in the queue");

        let job = &arena[key];
        let rank = self
            .jobs
            .iter()
            .position(|&other| self.policy.compare(job, &arena[other]) == Ordering::Less)
            .unwrap_or(self.jobs.len());
        self.jobs.insert(rank, key);
        rank
    }

    pub fn peek(&self) -> Option<JobKey> {
        self.jobs.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<JobKey> {
        self.jobs.pop_front()
    }

    pub fn at(&self, index: usize) -> Option<JobKey> {
        self.jobs.get(index).copied()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<JobKey> {
        self.jobs.remove(index)
    }

    pub fn remove_all<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(JobKey) -> bool,
    {
        let before = self.jobs.len();
        self.jobs.retain(|&key| !predicate(key));
        before - self.jobs.len()
    }

    pub fn contains(&self, key: JobKey) -> bool {
        self.jobs.contains(&key)
    }

    pub fn size(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = JobKey> + '_ {
        self.jobs.iter().copied()
    }

    pub fn is_sorted(&self, arena: &JobArena) -> bool {
        self.jobs.iter().zip(self.jobs.iter().skip(1)).all(|(&a, &b)| {
            self.policy.compare(&arena[a], &arena[b]) != Ordering::Greater
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Job;
    use slotmap::SlotMap;

    fn arena_with(jobs: &[(u64, i64, i64, i32)]) -> (JobArena, Vec<JobKey>) {
        let mut arena = SlotMap::with_key();
        let keys = jobs
            .iter()
            .map(|&(id, arrival, service, priority)| {
                arena.insert(Job::new(id, arrival, service, priority))
            })
            .collect();
        (arena, keys)
    }

    fn ids(queue: &JobQueue, arena: &JobArena) -> Vec<u64> {
        queue.iter().map(|key| arena[key].id).collect()
    }

    #[test]
    fn test_fcfs_appends_in_insertion_order() {
        let (arena, keys) = arena_with(&[(1, 0, 9, 3), (2, 1, 1, 0), (3, 2, 5, 1)]);
        let mut queue = JobQueue::new(Policy::Fcfs);

        assert_eq!(queue.insert(keys[0], &arena), 0);
        assert_eq!(queue.insert(keys[1], &arena), 1);
        assert_eq!(queue.insert(keys[2], &arena), 2);
        assert_eq!(ids(&queue, &arena), vec![1, 2, 3]);
    }

    #[test]
    fn test_sjf_orders_by_remaining_time() {
        let (arena, keys) = arena_with(&[(1, 0, 9, 0), (2, 1, 3, 0), (3, 2, 5, 0)]);
        let mut queue = JobQueue::new(Policy::Sjf);

        assert_eq!(queue.insert(keys[0], &arena), 0);
        assert_eq!(queue.insert(keys[1], &arena), 0);
        assert_eq!(queue.insert(keys[2], &arena), 1);
        assert_eq!(ids(&queue, &arena), vec![2, 3, 1]);
        assert!(queue.is_sorted(&arena));
    }

    #[test]
    fn test_equal_keys_keep_insertion_order() {
        let (arena, keys) = arena_with(&[(1, 0, 4, 2), (2, 1, 4, 2), (3, 2, 4, 2)]);
        let mut queue = JobQueue::new(Policy::Pri);

        for &key in &keys {
            queue.insert(key, &arena);
        }
        assert_eq!(ids(&queue, &arena), vec![1, 2, 3]);
    }

    #[test]
    fn test_earlier_arrival_wins_priority_tie() {
        // Job 1 arrived first but is inserted last, as after a preemption
        let (arena, keys) = arena_with(&[(1, 0, 4, 2), (2, 1, 4, 2), (3, 2, 4, 1)]);
        let mut queue = JobQueue::new(Policy::Ppri);

        queue.insert(keys[1], &arena);
        queue.insert(keys[2], &arena);
        assert_eq!(queue.insert(keys[0], &arena), 1);
        assert_eq!(ids(&queue, &arena), vec![3, 1, 2]);
        assert!(queue.is_sorted(&arena));
    }

    #[test]
    fn test_peek_pop_and_at() {
        let (arena, keys) = arena_with(&[(1, 0, 2, 0), (2, 1, 1, 0)]);
        let mut queue = JobQueue::new(Policy::Sjf);
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.pop_front(), None);

        queue.insert(keys[0], &arena);
        queue.insert(keys[1], &arena);
        assert_eq!(queue.peek(), Some(keys[1]));
        assert_eq!(queue.at(1), Some(keys[0]));
        assert_eq!(queue.at(2), None);
        assert_eq!(queue.size(), 2);

        assert_eq!(queue.pop_front(), Some(keys[1]));
        assert_eq!(queue.size(), 1);
    }

    #[test]
    fn test_remove_at_shifts_tail() {
        let (arena, keys) = arena_with(&[(1, 0, 1, 0), (2, 1, 1, 0), (3, 2, 1, 0)]);
        let mut queue = JobQueue::new(Policy::Rr);
        for &key in &keys {
            queue.insert(key, &arena);
        }

        assert_eq!(queue.remove_at(1), Some(keys[1]));
        assert_eq!(queue.remove_at(5), None);
        assert_eq!(ids(&queue, &arena), vec![1, 3]);
    }

    #[test]
    fn test_remove_all_preserves_order() {
        let (arena, keys) = arena_with(&[
            (1, 0, 1, 0),
            (2, 1, 2, 0),
            (3, 2, 3, 0),
            (4, 3, 4, 0),
        ]);
        let mut queue = JobQueue::new(Policy::Fcfs);
        for &key in &keys {
            queue.insert(key, &arena);
        }

        let removed = queue.remove_all(|key| arena[key].total_service_time % 2 == 0);
        assert_eq!(removed, 2);
        assert_eq!(ids(&queue, &arena), vec![1, 3]);
        assert_eq!(queue.remove_all(|_| false), 0);
    }
}
