//! Trace record shapes
//!
//! One JSON object per tick, plus standalone summary objects. Within a
//! tick object the `cpu`, `io`, and `memory` records are singletons
//! (later writes overwrite earlier ones); `state_transitions` is an
//! array; `queues`, `page_table`, and `frame_status` are snapshots.

use core_types::Tick;
use serde::{Deserialize, Serialize};

/// CPU event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CpuEvent {
    Exec,
    Preempt,
    Complete,
    Idle,
}

/// Per-tick CPU record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuRecord {
    pub event: CpuEvent,
    pub pid: i64,
    pub name: String,
    pub remaining: i64,
    pub ready_queue: usize,
    pub context_switch: bool,
}

/// I/O event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IoEvent {
    Step,
    Completed,
    Idle,
}

/// Per-tick device record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoRecord {
    pub device: String,
    pub event: IoEvent,
    pub pid: i64,
    pub name: String,
    pub remaining: i64,
    pub queue: usize,
}

/// Memory event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryEvent {
    PageFault,
    PageLoaded,
    PageReplaced,
}

/// Per-tick memory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub event: MemoryEvent,
    pub pid: i64,
    pub name: String,
    pub page_id: i64,
    pub frame_id: i64,
    pub total_page_faults: u64,
    pub total_replacements: u64,
}

/// One lifecycle transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub pid: i64,
    pub name: String,
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// End-of-tick queue snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub ready: Vec<u32>,
    pub blocked_memory: Vec<u32>,
    pub blocked_io: Vec<u32>,
    pub running: i64,
}

/// One page-table entry in a `page_table` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntryRecord {
    pub page: usize,
    pub frame: i64,
    pub valid: bool,
    pub referenced: bool,
    pub modified: bool,
}

/// Per-process page-table snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTableRecord {
    pub pid: i64,
    pub name: String,
    pub pages: Vec<PageEntryRecord>,
}

/// One frame in a `frame_status` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStatusRecord {
    pub frame: usize,
    pub occupied: bool,
    pub pid: i64,
    pub page: i64,
}

/// The merged object emitted for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io: Option<IoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub state_transitions: Vec<TransitionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queues: Option<QueueSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_table: Option<PageTableRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_status: Option<Vec<FrameStatusRecord>>,
}

impl TickRecord {
    /// True when nothing was recorded for the tick
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.io.is_none()
            && self.memory.is_none()
            && self.state_transitions.is_empty()
            && self.queues.is_none()
            && self.page_table.is_none()
            && self.frame_status.is_none()
    }
}

/// End-of-run CPU summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSummary {
    pub summary: String,
    pub total_time: Tick,
    pub cpu_utilization: f64,
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub avg_response_time: f64,
    pub context_switches: u64,
    pub algorithm: String,
}

impl CpuSummary {
    pub const TAG: &'static str = "CPU_METRICS";
}

/// End-of-run memory summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySummary {
    pub summary: String,
    pub total_page_faults: u64,
    pub total_replacements: u64,
    pub total_frames: usize,
    pub used_frames: usize,
    pub frame_utilization: f64,
    pub algorithm: String,
}

impl MemorySummary {
    pub const TAG: &'static str = "MEMORY_METRICS";
}
