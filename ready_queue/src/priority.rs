//! Static-priority ordering
//!
//! Lower numbers are stronger. Ties break by arrival tick, then PID.
//! The policy is preemptive: the engine compares the strongest queued
//! entry against the running process at every sub-tick boundary and
//! preempts when a strictly stronger one is waiting.

use crate::ReadyQueue;
use core_types::{Pid, Process, SchedulingAlgorithm, Tick};

#[derive(Debug, Clone, Copy)]
struct Entry {
    pid: Pid,
    priority: i32,
    arrival: Tick,
}

impl Entry {
    fn key(&self) -> (i32, Tick, Pid) {
        (self.priority, self.arrival, self.pid)
    }
}

/// Queue ordered by ascending priority number
#[derive(Debug, Default)]
pub struct PriorityQueue {
    entries: Vec<Entry>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Priority of the strongest queued entry
    pub fn strongest(&self) -> Option<i32> {
        self.entries.first().map(|e| e.priority)
    }
}

impl ReadyQueue for PriorityQueue {
    fn push(&mut self, process: &Process) {
        let entry = Entry {
            pid: process.pid,
            priority: process.priority,
            arrival: process.arrival,
        };
        let at = self
            .entries
            .iter()
            .position(|e| e.key() > entry.key())
            .unwrap_or(self.entries.len());
        self.entries.insert(at, entry);
    }

    fn peek(&self) -> Option<Pid> {
        self.entries.first().map(|e| e.pid)
    }

    fn remove(&mut self, pid: Pid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.pid != pid);
        self.entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn pids(&self) -> Vec<Pid> {
        self.entries.iter().map(|e| e.pid).collect()
    }

    fn algorithm(&self) -> SchedulingAlgorithm {
        SchedulingAlgorithm::Priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::proc;

    #[test]
    fn test_orders_by_priority_number() {
        let mut q = PriorityQueue::new();
        q.push(&proc(1, 0, 8, 3));
        q.push(&proc(2, 1, 4, 1));
        q.push(&proc(3, 2, 9, 4));
        q.push(&proc(4, 3, 5, 2));
        assert_eq!(q.pids(), vec![Pid(2), Pid(4), Pid(1), Pid(3)]);
        assert_eq!(q.strongest(), Some(1));
    }

    #[test]
    fn test_equal_priority_falls_back_to_arrival_then_pid() {
        let mut q = PriorityQueue::new();
        q.push(&proc(9, 5, 1, 2));
        q.push(&proc(3, 5, 1, 2));
        q.push(&proc(6, 0, 1, 2));
        assert_eq!(q.pids(), vec![Pid(6), Pid(3), Pid(9)]);
    }
}
