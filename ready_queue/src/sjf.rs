//! Shortest-job-first ordering
//!
//! Non-preemptive: entries order by the remaining duration of the
//! process's current burst *as of insertion*. Ties break by arrival
//! tick, then PID. The queue never re-sorts on its own; the engine
//! re-inserts a process whenever it re-enters READY.

use crate::ReadyQueue;
use core_types::{Pid, Process, SchedulingAlgorithm, Tick};

#[derive(Debug, Clone, Copy)]
struct Entry {
    pid: Pid,
    remaining: u64,
    arrival: Tick,
}

impl Entry {
    fn key(&self) -> (u64, Tick, Pid) {
        (self.remaining, self.arrival, self.pid)
    }
}

/// Queue ordered by ascending current-burst remaining time
#[derive(Debug, Default)]
pub struct SjfQueue {
    entries: Vec<Entry>,
}

impl SjfQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadyQueue for SjfQueue {
    fn push(&mut self, process: &Process) {
        let entry = Entry {
            pid: process.pid,
            remaining: process.current_burst().map(|b| b.remaining).unwrap_or(0),
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
        SchedulingAlgorithm::Sjf
    }
}
