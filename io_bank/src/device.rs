//! One simulated device
//!
//! A device serves at most one request at a time. Each sub-tick it
//! pops a request if idle, debits one sub-tick of service, reports a
//! completion at `now + 1` when the countdown reaches zero, and under
//! round-robin pushes an unfinished request back to the tail once the
//! device quantum is spent.

use crate::queue::{make_device_queue, DeviceQueue};
use crate::request::IoRequest;
use core_types::{IoSchedulingAlgorithm, Pid, Tick};
use metrics::{IoEvent, IoRecord, MetricsCollector};
use std::sync::Arc;

/// A completed request, reported to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoCompletion {
    /// Process whose burst finished
    pub pid: Pid,
    /// Device that served it
    pub device: String,
    /// Completion time (`now + 1` of the final service sub-tick)
    pub at: Tick,
}

struct ActiveRequest {
    request: IoRequest,
    served_in_slice: u64,
}

/// One named device with its queue and counters
pub struct IoDevice {
    name: String,
    queue: Box<dyn DeviceQueue>,
    /// Device quantum; only round-robin queues have one
    quantum: Option<u64>,
    active: Option<ActiveRequest>,
    busy_ticks: u64,
    device_switches: u64,
    completions: u64,
    metrics: Arc<MetricsCollector>,
}

impl IoDevice {
    /// Creates a device under the given queueing policy
    pub fn new(
        name: impl Into<String>,
        algorithm: IoSchedulingAlgorithm,
        io_quantum: u64,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        let quantum = match algorithm {
            IoSchedulingAlgorithm::Fcfs => None,
            IoSchedulingAlgorithm::RoundRobin => Some(io_quantum.max(1)),
        };
        Self {
            name: name.into(),
            queue: make_device_queue(algorithm),
            quantum,
            active: None,
            busy_ticks: 0,
            device_switches: 0,
            completions: 0,
            metrics,
        }
    }

    /// Adds a request to the device queue
    pub fn enqueue(&mut self, request: IoRequest) {
        self.queue.push(request);
    }

    /// Serves one sub-tick; returns the completion fired, if any
    pub fn tick(&mut self, now: Tick) -> Option<IoCompletion> {
        if self.active.is_none() {
            if let Some(request) = self.queue.pop() {
                self.device_switches += 1;
                self.active = Some(ActiveRequest {
                    request,
                    served_in_slice: 0,
                });
            }
        }

        let Some(active) = self.active.as_mut() else {
            self.metrics.log_io(
                now,
                IoRecord {
                    device: self.name.clone(),
                    event: IoEvent::Idle,
                    pid: -1,
                    name: String::new(),
                    remaining: 0,
                    queue: self.queue.len(),
                },
            );
            return None;
        };

        if active.request.start_tick.is_none() {
            active.request.start_tick = Some(now);
        }
        active.request.remaining -= 1;
        active.served_in_slice += 1;
        self.busy_ticks += 1;

        if active.request.is_complete() {
            let mut request = self
                .active
                .take()
                .expect("active request checked above")
                .request;
            request.completion_tick = Some(now + 1);
            self.completions += 1;
            self.metrics.log_io(
                now,
                IoRecord {
                    device: self.name.clone(),
                    event: IoEvent::Completed,
                    pid: i64::from(request.pid.0),
                    name: request.process_name.clone(),
                    remaining: 0,
                    queue: self.queue.len(),
                },
            );
            return Some(IoCompletion {
                pid: request.pid,
                device: self.name.clone(),
                at: now + 1,
            });
        }

        self.metrics.log_io(
            now,
            IoRecord {
                device: self.name.clone(),
                event: IoEvent::Step,
                pid: i64::from(active.request.pid.0),
                name: active.request.process_name.clone(),
                remaining: active.request.remaining as i64,
                queue: self.queue.len(),
            },
        );

        if let Some(quantum) = self.quantum {
            if self.active.as_ref().map(|a| a.served_in_slice) >= Some(quantum) {
                let request = self
                    .active
                    .take()
                    .expect("active request checked above")
                    .request;
                self.queue.push(request);
            }
        }
        None
    }

    /// Device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True while a request is being served
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// True while work is queued or in flight
    pub fn has_pending(&self) -> bool {
        self.active.is_some() || !self.queue.is_empty()
    }

    /// Requests waiting behind the active one
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Sub-ticks spent serving requests
    pub fn busy_ticks(&self) -> u64 {
        self.busy_ticks
    }

    /// Times the device picked up a request from its queue
    pub fn device_switches(&self) -> u64 {
        self.device_switches
    }

    /// Requests fully served
    pub fn completions(&self) -> u64 {
        self.completions
    }

    /// Clears the queue, the active request, and the counters
    pub fn reset(&mut self) {
        self.queue.clear();
        self.active = None;
        self.busy_ticks = 0;
        self.device_switches = 0;
        self.completions = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(algorithm: IoSchedulingAlgorithm, quantum: u64) -> IoDevice {
        IoDevice::new("disk", algorithm, quantum, Arc::new(MetricsCollector::new()))
    }

    fn request(pid: u32, duration: u64, arrival: Tick) -> IoRequest {
        IoRequest::new(Pid(pid), format!("P{pid}"), "disk", duration, arrival)
    }

    #[test]
    fn test_fcfs_serial_completions() {
        // Three requests of 5/3/4 sub-ticks arriving at 0/1/2 finish
        // at 5, 8, and 12 with one pickup each.
        let mut dev = device(IoSchedulingAlgorithm::Fcfs, 1);
        let mut completions = Vec::new();
        for now in 0..12 {
            match now {
                0 => dev.enqueue(request(1, 5, 0)),
                1 => dev.enqueue(request(2, 3, 1)),
                2 => dev.enqueue(request(3, 4, 2)),
                _ => {}
            }
            if let Some(done) = dev.tick(now) {
                completions.push((done.pid, done.at));
            }
        }
        assert_eq!(
            completions,
            vec![(Pid(1), 5), (Pid(2), 8), (Pid(3), 12)]
        );
        assert_eq!(dev.device_switches(), 3);
        assert_eq!(dev.completions(), 3);
        assert_eq!(dev.busy_ticks(), 12);
        assert!(!dev.has_pending());
    }

    #[test]
    fn test_round_robin_alternates_at_quantum() {
        let mut dev = device(IoSchedulingAlgorithm::RoundRobin, 2);
        dev.enqueue(request(1, 4, 0));
        dev.enqueue(request(2, 2, 0));

        let mut completions = Vec::new();
        for now in 0..8 {
            if let Some(done) = dev.tick(now) {
                completions.push((done.pid, done.at));
            }
        }
        // P1 serves 2, P2 serves 2 and completes, P1 serves its last 2.
        assert_eq!(completions, vec![(Pid(2), 4), (Pid(1), 6)]);
    }

    #[test]
    fn test_idle_device_reports_nothing() {
        let mut dev = device(IoSchedulingAlgorithm::Fcfs, 1);
        assert!(dev.tick(0).is_none());
        assert!(!dev.is_busy());
        assert_eq!(dev.busy_ticks(), 0);
    }

    #[test]
    fn test_completion_exactly_at_quantum_boundary() {
        let mut dev = device(IoSchedulingAlgorithm::RoundRobin, 2);
        dev.enqueue(request(1, 2, 0));
        assert!(dev.tick(0).is_none());
        let done = dev.tick(1).unwrap();
        assert_eq!(done.at, 2);
        // Completed requests are not rotated back.
        assert!(!dev.has_pending());
    }
}
