//! Round-robin ordering
//!
//! The queue itself is FIFO; the quantum and the rotation on expiry
//! are enforced by the engine, which re-enqueues a preempted process
//! at the tail.

use crate::ReadyQueue;
use core_types::{Pid, Process, SchedulingAlgorithm};
use std::collections::VecDeque;

/// FIFO queue dispatched under an engine-enforced quantum
#[derive(Debug, Default)]
pub struct RoundRobinQueue {
    queue: VecDeque<Pid>,
}

impl RoundRobinQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadyQueue for RoundRobinQueue {
    fn push(&mut self, process: &Process) {
        self.queue.push_back(process.pid);
    }

    fn peek(&self) -> Option<Pid> {
        self.queue.front().copied()
    }

    fn remove(&mut self, pid: Pid) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&p| p != pid);
        self.queue.len() != before
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn pids(&self) -> Vec<Pid> {
        self.queue.iter().copied().collect()
    }

    fn algorithm(&self) -> SchedulingAlgorithm {
        SchedulingAlgorithm::RoundRobin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::proc;

    #[test]
    fn test_rotation_via_reinsert() {
        let mut q = RoundRobinQueue::new();
        let p1 = proc(1, 0, 10, 0);
        q.push(&p1);
        q.push(&proc(2, 0, 10, 0));

        // The engine's preemption path: drop the incumbent, re-add at tail.
        assert!(q.remove(Pid(1)));
        q.push(&p1);
        assert_eq!(q.pids(), vec![Pid(2), Pid(1)]);
    }
}
