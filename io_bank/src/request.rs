//! I/O requests

use core_types::{Pid, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ioreq:{}", self.0)
    }
}

/// One submitted I/O burst
///
/// The request owns a countdown copied from the burst at submission;
/// the process's own burst record is reconciled by the engine when the
/// completion comes back.
#[derive(Debug, Clone)]
pub struct IoRequest {
    /// Identity for queue bookkeeping
    pub id: RequestId,
    /// Requesting process
    pub pid: Pid,
    /// Display name of the process, for trace records
    pub process_name: String,
    /// Target device
    pub device: String,
    /// Original burst duration
    pub total: u64,
    /// Sub-ticks still to serve
    pub remaining: u64,
    /// Tick the request was submitted
    pub arrival_tick: Tick,
    /// Tick the device first served it
    pub start_tick: Option<Tick>,
    /// Tick the request completed
    pub completion_tick: Option<Tick>,
}

impl IoRequest {
    /// Creates a request for `duration` sub-ticks of service
    pub fn new(
        pid: Pid,
        process_name: impl Into<String>,
        device: impl Into<String>,
        duration: u64,
        arrival_tick: Tick,
    ) -> Self {
        Self {
            id: RequestId::new(),
            pid,
            process_name: process_name.into(),
            device: device.into(),
            total: duration,
            remaining: duration,
            arrival_tick,
            start_tick: None,
            completion_tick: None,
        }
    }

    /// True once fully served
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}
