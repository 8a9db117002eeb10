//! Process lifecycle states

use core::fmt;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a process
///
/// The transition graph is owned by the engine; subsystems only read
/// the current state (the replacement policies inspect it to rank
/// eviction candidates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Created, arrival tick not yet reached
    New,
    /// Eligible for dispatch
    Ready,
    /// Blocked until every required page is resident
    MemoryWaiting,
    /// On the CPU (at most one process at any tick)
    Running,
    /// Blocked on an I/O device
    IoWaiting,
    /// Finished; no field is written again
    Terminated,
}

impl ProcessState {
    /// Trace-format name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::MemoryWaiting => "MEMORY_WAITING",
            ProcessState::Running => "RUNNING",
            ProcessState::IoWaiting => "IO_WAITING",
            ProcessState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names_match_trace_format() {
        assert_eq!(ProcessState::MemoryWaiting.as_str(), "MEMORY_WAITING");
        assert_eq!(ProcessState::IoWaiting.as_str(), "IO_WAITING");
        assert_eq!(
            serde_json::to_string(&ProcessState::Ready).unwrap(),
            "\"READY\""
        );
    }
}
