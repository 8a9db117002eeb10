//! PID-keyed process arena
//!
//! The engine owns exactly one `ProcessTable`; the memory manager and
//! the I/O bank receive it by reference for the duration of a call and
//! otherwise hold only PIDs. A `BTreeMap` keeps every whole-table walk
//! (arrival admission, queue snapshots) in ascending PID order, which
//! is the tie-break rule for simultaneous events.

use crate::ids::Pid;
use crate::process::Process;
use crate::state::ProcessState;
use std::collections::BTreeMap;

/// The process arena
#[derive(Debug, Default, Clone)]
pub struct ProcessTable {
    map: BTreeMap<Pid, Process>,
}

impl ProcessTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a process, replacing any previous record with the PID
    pub fn insert(&mut self, process: Process) {
        self.map.insert(process.pid, process);
    }

    /// Looks up a process
    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.map.get(&pid)
    }

    /// Looks up a process mutably
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.map.get_mut(&pid)
    }

    /// Iterates processes in ascending PID order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.map.values()
    }

    /// Iterates processes mutably in ascending PID order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.map.values_mut()
    }

    /// PIDs currently in `state`, ascending
    pub fn pids_in_state(&self, state: ProcessState) -> Vec<Pid> {
        self.map
            .values()
            .filter(|p| p.state == state)
            .map(|p| p.pid)
            .collect()
    }

    /// True once every process is TERMINATED
    pub fn all_terminated(&self) -> bool {
        self.map
            .values()
            .all(|p| p.state == ProcessState::Terminated)
    }

    /// Number of processes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no process is loaded
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every process
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
