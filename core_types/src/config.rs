//! Resolved simulator configuration
//!
//! This is the validated form produced by the config-file parser and
//! consumed by the engine builder. Field defaults match the documented
//! configuration defaults.

use crate::algorithm::{IoSchedulingAlgorithm, ReplacementAlgorithm, SchedulingAlgorithm};
use serde::{Deserialize, Serialize};

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of physical frames (N >= 1)
    pub total_memory_frames: usize,
    /// Frame size in bytes; informational, unused by the core
    pub frame_size: u64,
    /// CPU ready-queue policy
    pub scheduling_algorithm: SchedulingAlgorithm,
    /// Page-replacement policy
    pub page_replacement_algorithm: ReplacementAlgorithm,
    /// Policy applied to every device
    pub io_scheduling_algorithm: IoSchedulingAlgorithm,
    /// CPU RoundRobin quantum (>= 1)
    pub quantum: u64,
    /// Device RoundRobin quantum (>= 1)
    pub io_quantum: u64,
    /// Sub-ticks to serve one page load (>= 1)
    pub page_fault_latency: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_memory_frames: 16,
            frame_size: 4096,
            scheduling_algorithm: SchedulingAlgorithm::Fcfs,
            page_replacement_algorithm: ReplacementAlgorithm::Fifo,
            io_scheduling_algorithm: IoSchedulingAlgorithm::Fcfs,
            quantum: 4,
            io_quantum: 2,
            page_fault_latency: 1,
        }
    }
}
