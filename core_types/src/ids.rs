//! Identifier and time aliases
//!
//! PIDs come from the workload file, so unlike generated identities
//! they are plain integers wrapped in a newtype for ordering and
//! display. Frames and pages are dense indices.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Simulated time, in whole sub-ticks since the start of the run.
pub type Tick = u64;

/// Index of a physical frame (0..N-1).
pub type FrameId = usize;

/// Index of a logical page within one process's page table.
pub type PageId = usize;

/// Process identifier
///
/// Workload-assigned, unique per run. Ordering is numeric: tie-break
/// rules throughout the simulator ("ties broken by PID") rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl Pid {
    /// Returns the raw numeric value
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Sentinel form used by trace records, where "no process" is -1.
    pub fn option_as_i64(pid: Option<Pid>) -> i64 {
        pid.map(|p| i64::from(p.0)).unwrap_or(-1)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
