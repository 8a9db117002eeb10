//! The process record
//!
//! One record per workload process: schedule attributes, the burst
//! sequence with its cursor, the page table, and the bookkeeping that
//! feeds the end-of-run metrics. The record is data only; every
//! transition is driven by the engine.

use crate::burst::{Burst, BurstKind};
use crate::ids::{Pid, Tick};
use crate::page::PageTableEntry;
use crate::state::ProcessState;
use serde::{Deserialize, Serialize};

/// A simulated process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// Unique identifier
    pub pid: Pid,
    /// Display name from the workload file
    pub name: String,
    /// Tick at which the process becomes admissible
    pub arrival: Tick,
    /// Static priority; lower numbers are stronger
    pub priority: i32,
    /// The burst schedule
    pub bursts: Vec<Burst>,
    /// Index of the burst currently being served
    pub cursor: usize,
    /// Number of logical pages the process requires
    pub pages_required: usize,
    /// Page table, one entry per required page; built at admission
    pub page_table: Vec<PageTableEntry>,
    /// Lifecycle state
    pub state: ProcessState,
    /// Page faults charged to this process
    pub page_faults: u64,
    /// Evictions of this process's pages
    pub replacements: u64,
    /// Tick of the first dispatch, unset until then
    pub first_start: Option<Tick>,
    /// Tick the process terminated
    pub completion: Option<Tick>,
    /// completion - arrival, computed at termination
    pub turnaround: Option<u64>,
    /// turnaround minus all burst service time, computed at termination
    pub waiting: Option<u64>,
    /// first_start - arrival, computed at termination
    pub response: Option<u64>,
}

impl Process {
    /// Creates a process in state NEW
    pub fn new(
        pid: Pid,
        name: impl Into<String>,
        arrival: Tick,
        bursts: Vec<Burst>,
        priority: i32,
        pages_required: usize,
    ) -> Self {
        Self {
            pid,
            name: name.into(),
            arrival,
            priority,
            bursts,
            cursor: 0,
            pages_required,
            page_table: Vec::new(),
            state: ProcessState::New,
            page_faults: 0,
            replacements: 0,
            first_start: None,
            completion: None,
            turnaround: None,
            waiting: None,
            response: None,
        }
    }

    /// True once the arrival tick has been reached
    pub fn has_arrived(&self, now: Tick) -> bool {
        self.arrival <= now
    }

    /// The burst at the cursor, if any remain
    pub fn current_burst(&self) -> Option<&Burst> {
        self.bursts.get(self.cursor)
    }

    /// Mutable access to the burst at the cursor
    pub fn current_burst_mut(&mut self) -> Option<&mut Burst> {
        self.bursts.get_mut(self.cursor)
    }

    /// Moves the cursor past the current burst
    ///
    /// Callers must only advance once the burst is fully served.
    pub fn advance_burst(&mut self) {
        debug_assert!(self
            .current_burst()
            .map(Burst::is_complete)
            .unwrap_or(false));
        self.cursor += 1;
    }

    /// True once every burst has been served
    pub fn all_bursts_complete(&self) -> bool {
        self.cursor >= self.bursts.len()
    }

    /// True iff the current burst is CPU work
    pub fn on_cpu_burst(&self) -> bool {
        matches!(
            self.current_burst().map(|b| b.kind),
            Some(BurstKind::Cpu)
        )
    }

    /// True iff the current burst is I/O work
    pub fn on_io_burst(&self) -> bool {
        matches!(self.current_burst().map(|b| b.kind), Some(BurstKind::Io))
    }

    /// Total CPU service time of the whole schedule
    pub fn total_cpu_time(&self) -> u64 {
        self.bursts
            .iter()
            .filter(|b| b.kind == BurstKind::Cpu)
            .map(|b| b.total)
            .sum()
    }

    /// Total I/O service time of the whole schedule
    pub fn total_io_time(&self) -> u64 {
        self.bursts
            .iter()
            .filter(|b| b.kind == BurstKind::Io)
            .map(|b| b.total)
            .sum()
    }

    /// Number of resident pages right now
    pub fn resident_pages(&self) -> usize {
        self.page_table.iter().filter(|p| p.resident).count()
    }

    /// Records termination and derives the summary metrics
    ///
    /// turnaround = completion - arrival
    /// waiting    = turnaround - total service time
    /// response   = first_start - arrival
    pub fn finalize_metrics(&mut self, completion: Tick) {
        self.completion = Some(completion);
        let turnaround = completion.saturating_sub(self.arrival);
        self.turnaround = Some(turnaround);
        let service = self.total_cpu_time() + self.total_io_time();
        self.waiting = Some(turnaround.saturating_sub(service));
        self.response = self.first_start.map(|s| s.saturating_sub(self.arrival));
    }

    /// Returns the record to its pre-run state, keeping the schedule
    pub fn reset(&mut self) {
        for burst in &mut self.bursts {
            burst.reset();
        }
        self.cursor = 0;
        self.page_table.clear();
        self.state = ProcessState::New;
        self.page_faults = 0;
        self.replacements = 0;
        self.first_start = None;
        self.completion = None;
        self.turnaround = None;
        self.waiting = None;
        self.response = None;
    }
}
