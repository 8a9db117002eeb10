//! First-come-first-served ordering

use crate::ReadyQueue;
use core_types::{Pid, Process, SchedulingAlgorithm};
use std::collections::VecDeque;

/// Plain insertion-order queue
#[derive(Debug, Default)]
pub struct FcfsQueue {
    queue: VecDeque<Pid>,
}

impl FcfsQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadyQueue for FcfsQueue {
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
        SchedulingAlgorithm::Fcfs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::proc;

    #[test]
    fn test_insertion_order() {
        let mut q = FcfsQueue::new();
        q.push(&proc(3, 0, 5, 0));
        q.push(&proc(1, 1, 5, 0));
        q.push(&proc(2, 2, 5, 0));
        assert_eq!(q.peek(), Some(Pid(3)));
        assert_eq!(q.pids(), vec![Pid(3), Pid(1), Pid(2)]);
    }

    #[test]
    fn test_remove() {
        let mut q = FcfsQueue::new();
        q.push(&proc(1, 0, 5, 0));
        q.push(&proc(2, 0, 5, 0));
        assert!(q.remove(Pid(1)));
        assert!(!q.remove(Pid(1)));
        assert_eq!(q.peek(), Some(Pid(2)));
        assert_eq!(q.len(), 1);
    }
}
