//! # Metrics
//!
//! Structured trace emission for the simulator: a tick-keyed buffer in
//! front of a JSON-line sink, plus the end-of-run summary records.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Components log typed records tagged with their tick from any
//! context; the collector serialises internally and never emits ticks
//! out of order, no matter how the records arrived.

pub mod collector;
pub mod record;

pub use collector::{MetricsCollector, SinkError};
pub use record::{
    CpuEvent, CpuRecord, CpuSummary, FrameStatusRecord, IoEvent, IoRecord, MemoryEvent,
    MemoryRecord, MemorySummary, PageEntryRecord, PageTableRecord, QueueSnapshot, TickRecord,
    TransitionRecord,
};
