//! Per-device request queues

use crate::request::IoRequest;
use core_types::IoSchedulingAlgorithm;
use std::collections::VecDeque;

/// Queueing contract for one device
///
/// Both policies pop from the front; round-robin behaviour comes from
/// the device pushing an unfinished request back at the tail when its
/// quantum expires.
pub trait DeviceQueue: Send {
    /// Adds a request at the tail
    fn push(&mut self, request: IoRequest);

    /// Takes the next request to serve
    fn pop(&mut self) -> Option<IoRequest>;

    /// Queued requests, excluding the one being served
    fn len(&self) -> usize;

    /// True when nothing is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every queued request
    fn clear(&mut self);

    /// The policy this queue implements
    fn algorithm(&self) -> IoSchedulingAlgorithm;
}

/// First-come-first-served device queue
#[derive(Debug, Default)]
pub struct FcfsDeviceQueue {
    queue: VecDeque<IoRequest>,
}

impl FcfsDeviceQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceQueue for FcfsDeviceQueue {
    fn push(&mut self, request: IoRequest) {
        self.queue.push_back(request);
    }

    fn pop(&mut self) -> Option<IoRequest> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn algorithm(&self) -> IoSchedulingAlgorithm {
        IoSchedulingAlgorithm::Fcfs
    }
}

/// Round-robin device queue
#[derive(Debug, Default)]
pub struct RoundRobinDeviceQueue {
    queue: VecDeque<IoRequest>,
}

impl RoundRobinDeviceQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceQueue for RoundRobinDeviceQueue {
    fn push(&mut self, request: IoRequest) {
        self.queue.push_back(request);
    }

    fn pop(&mut self) -> Option<IoRequest> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn algorithm(&self) -> IoSchedulingAlgorithm {
        IoSchedulingAlgorithm::RoundRobin
    }
}

/// Builds the queue for a configured policy
pub fn make_device_queue(algorithm: IoSchedulingAlgorithm) -> Box<dyn DeviceQueue> {
    match algorithm {
        IoSchedulingAlgorithm::Fcfs => Box::new(FcfsDeviceQueue::new()),
        IoSchedulingAlgorithm::RoundRobin => Box::new(RoundRobinDeviceQueue::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Pid;

    #[test]
    fn test_fifo_order() {
        let mut q = FcfsDeviceQueue::new();
        q.push(IoRequest::new(Pid(1), "P1", "disk", 5, 0));
        q.push(IoRequest::new(Pid(2), "P2", "disk", 3, 1));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop().unwrap().pid, Pid(1));
        assert_eq!(q.pop().unwrap().pid, Pid(2));
        assert!(q.pop().is_none());
    }
}
