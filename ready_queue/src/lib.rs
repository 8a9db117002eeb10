//! # Ready Queue
//!
//! The CPU ready-queue policies behind one narrow contract.
//!
//! ## Philosophy
//!
//! - **Mechanism, not policy ownership**: queues order PIDs; the
//!   engine owns every transition and enforces quanta and preemption.
//! - **Keys captured at insertion**: a policy snapshots the fields it
//!   orders on when a process is pushed and never re-reads process
//!   state afterwards. The engine re-inserts on every READY
//!   transition, which is when orderings refresh.
//! - **Determinism**: same pushes, same pops.

mod fcfs;
mod priority;
mod round_robin;
mod sjf;

pub use fcfs::FcfsQueue;
pub use priority::PriorityQueue;
pub use round_robin::RoundRobinQueue;
pub use sjf::SjfQueue;

use core_types::{Pid, Process, SchedulingAlgorithm};

/// Ordering contract shared by the four policies
///
/// `push` captures whatever the policy orders on; `peek` exposes the
/// next candidate without removing it; `remove` drops a PID wherever
/// it sits (stale entries, preempted processes, termination).
pub trait ReadyQueue: Send {
    /// Inserts a process according to the policy's ordering rule
    fn push(&mut self, process: &Process);

    /// The next candidate, if any
    fn peek(&self) -> Option<Pid>;

    /// Removes `pid` from the queue; true if it was present
    fn remove(&mut self, pid: Pid) -> bool;

    /// Number of queued processes
    fn len(&self) -> usize;

    /// True when nothing is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry
    fn clear(&mut self);

    /// Queue contents in dispatch order, for snapshots
    fn pids(&self) -> Vec<Pid>;

    /// The policy this queue implements
    fn algorithm(&self) -> SchedulingAlgorithm;
}

/// Builds the queue for a configured policy
pub fn make_ready_queue(algorithm: SchedulingAlgorithm) -> Box<dyn ReadyQueue> {
    match algorithm {
        SchedulingAlgorithm::Fcfs => Box::new(FcfsQueue::new()),
        SchedulingAlgorithm::Sjf => Box::new(SjfQueue::new()),
        SchedulingAlgorithm::RoundRobin => Box::new(RoundRobinQueue::new()),
        SchedulingAlgorithm::Priority => Box::new(PriorityQueue::new()),
    }
}
