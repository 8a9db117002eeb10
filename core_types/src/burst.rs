//! CPU and I/O bursts
//!
//! A burst is a maximal contiguous interval of one kind of work in a
//! process's schedule. I/O bursts name the device they run on; a
//! missing name means the default device (`disk`).

use serde::{Deserialize, Serialize};

/// Default device for I/O bursts that do not name one.
pub const DEFAULT_IO_DEVICE: &str = "disk";

/// Kind of work a burst represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    /// Compute on the CPU
    Cpu,
    /// Service on an I/O device
    Io,
}

/// One burst of a process schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burst {
    /// CPU or I/O
    pub kind: BurstKind,
    /// Device name, only meaningful for I/O bursts
    pub device: Option<String>,
    /// Original duration in sub-ticks (>= 1)
    pub total: u64,
    /// Sub-ticks still to be served
    pub remaining: u64,
}

impl Burst {
    /// Creates a CPU burst of `duration` sub-ticks
    pub fn cpu(duration: u64) -> Self {
        Self {
            kind: BurstKind::Cpu,
            device: None,
            total: duration,
            remaining: duration,
        }
    }

    /// Creates an I/O burst on the default device
    pub fn io(duration: u64) -> Self {
        Self {
            kind: BurstKind::Io,
            device: None,
            total: duration,
            remaining: duration,
        }
    }

    /// Creates an I/O burst on a named device
    pub fn io_on(duration: u64, device: impl Into<String>) -> Self {
        Self {
            kind: BurstKind::Io,
            device: Some(device.into()),
            total: duration,
            remaining: duration,
        }
    }

    /// Name of the device this burst runs on (default `disk`)
    pub fn device_name(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_IO_DEVICE)
    }

    /// True once the burst has been fully served
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Restores the burst to its unserved state
    pub fn reset(&mut self) {
        self.remaining = self.total;
    }
}
