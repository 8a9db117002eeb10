//! The collector: a tick-keyed buffer in front of a line sink
//!
//! Any component may log from any context; the buffer is behind a
//! mutex and the emitter only ever writes ticks in ascending order.
//! Singleton records (`cpu`, `io`, `memory`) for a tick are
//! overwritten by later writes; transition records accumulate.

use crate::record::{
    CpuRecord, CpuSummary, FrameStatusRecord, IoRecord, MemoryRecord, MemorySummary,
    PageTableRecord, QueueSnapshot, TickRecord, TransitionRecord,
};
use core_types::Tick;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Failure to open or write the output sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open trace file: {0}")]
    Open(#[source] std::io::Error),
    #[error("cannot write trace line: {0}")]
    Write(#[source] std::io::Error),
}

enum Sink {
    Disabled,
    Stdout,
    File(BufWriter<File>),
    /// In-memory capture, for assertions in tests
    Capture(Vec<String>),
}

struct Inner {
    buffer: BTreeMap<Tick, TickRecord>,
    sink: Sink,
}

/// Buffered, tick-ordered JSON-line emitter
pub struct MetricsCollector {
    inner: Mutex<Inner>,
}

impl MetricsCollector {
    /// Creates a collector with the sink disabled
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                buffer: BTreeMap::new(),
                sink: Sink::Disabled,
            }),
        }
    }

    /// Routes output to a file, appending lines
    pub fn enable_file(&self, path: impl AsRef<Path>) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(SinkError::Open)?;
        let mut inner = self.lock();
        inner.sink = Sink::File(BufWriter::new(file));
        Ok(())
    }

    /// Routes output to standard output
    pub fn enable_stdout(&self) {
        self.lock().sink = Sink::Stdout;
    }

    /// Routes output to an in-memory buffer readable via
    /// [`captured_lines`](Self::captured_lines)
    pub fn enable_capture(&self) {
        self.lock().sink = Sink::Capture(Vec::new());
    }

    /// Flushes everything buffered and disables the sink
    pub fn disable(&self) {
        self.flush_all();
        self.lock().sink = Sink::Disabled;
    }

    /// True unless the sink is disabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self.lock().sink, Sink::Disabled)
    }

    /// Lines written so far to the capture sink
    pub fn captured_lines(&self) -> Vec<String> {
        match &self.lock().sink {
            Sink::Capture(lines) => lines.clone(),
            _ => Vec::new(),
        }
    }

    /// Records the CPU event for `tick`, replacing any earlier one
    pub fn log_cpu(&self, tick: Tick, record: CpuRecord) {
        self.lock().entry(tick).cpu = Some(record);
    }

    /// Records the device event for `tick`, replacing any earlier one
    pub fn log_io(&self, tick: Tick, record: IoRecord) {
        self.lock().entry(tick).io = Some(record);
    }

    /// Records the memory event for `tick`, replacing any earlier one
    pub fn log_memory(&self, tick: Tick, record: MemoryRecord) {
        self.lock().entry(tick).memory = Some(record);
    }

    /// Appends a lifecycle transition to `tick`
    pub fn log_transition(&self, tick: Tick, record: TransitionRecord) {
        self.lock().entry(tick).state_transitions.push(record);
    }

    /// Records the queue snapshot for `tick`
    pub fn log_queues(&self, tick: Tick, snapshot: QueueSnapshot) {
        self.lock().entry(tick).queues = Some(snapshot);
    }

    /// Records a per-process page-table snapshot for `tick`
    pub fn log_page_table(&self, tick: Tick, record: PageTableRecord) {
        self.lock().entry(tick).page_table = Some(record);
    }

    /// Records the frame-table snapshot for `tick`
    pub fn log_frame_status(&self, tick: Tick, frames: Vec<FrameStatusRecord>) {
        self.lock().entry(tick).frame_status = Some(frames);
    }

    /// Emits one buffered tick, if present and non-empty
    pub fn flush_tick(&self, tick: Tick) {
        let mut inner = self.lock();
        if let Some(record) = inner.buffer.remove(&tick) {
            if !record.is_empty() {
                inner.write_record(&record);
            }
        }
    }

    /// Emits every buffered tick in ascending order
    pub fn flush_all(&self) {
        let mut inner = self.lock();
        while let Some((_, record)) = inner.buffer.pop_first() {
            if !record.is_empty() {
                inner.write_record(&record);
            }
        }
    }

    /// Emits the standalone CPU summary record
    #[allow(clippy::too_many_arguments)]
    pub fn log_cpu_summary(
        &self,
        total_time: Tick,
        cpu_utilization: f64,
        avg_waiting_time: f64,
        avg_turnaround_time: f64,
        avg_response_time: f64,
        context_switches: u64,
        algorithm: &str,
    ) {
        let summary = CpuSummary {
            summary: CpuSummary::TAG.to_string(),
            total_time,
            cpu_utilization,
            avg_waiting_time,
            avg_turnaround_time,
            avg_response_time,
            context_switches,
            algorithm: algorithm.to_string(),
        };
        self.lock().write_json(&summary);
    }

    /// Emits the standalone memory summary record
    pub fn log_memory_summary(
        &self,
        total_page_faults: u64,
        total_replacements: u64,
        total_frames: usize,
        used_frames: usize,
        algorithm: &str,
    ) {
        let frame_utilization = if total_frames > 0 {
            100.0 * used_frames as f64 / total_frames as f64
        } else {
            0.0
        };
        let summary = MemorySummary {
            summary: MemorySummary::TAG.to_string(),
            total_page_faults,
            total_replacements,
            total_frames,
            used_frames,
            frame_utilization,
            algorithm: algorithm.to_string(),
        };
        self.lock().write_json(&summary);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Keep flushing even if a logger panicked mid-write.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn entry(&mut self, tick: Tick) -> &mut TickRecord {
        self.buffer.entry(tick).or_insert_with(|| TickRecord {
            tick,
            ..TickRecord::default()
        })
    }

    fn write_record(&mut self, record: &TickRecord) {
        self.write_json(record);
    }

    fn write_json<T: serde::Serialize>(&mut self, value: &T) {
        if matches!(self.sink, Sink::Disabled) {
            return;
        }
        let line = match serde_json::to_string(value) {
            Ok(line) => line,
            Err(_) => return,
        };
        match &mut self.sink {
            Sink::Disabled => {}
            Sink::Stdout => {
                println!("{line}");
            }
            Sink::File(out) => {
                let _ = writeln!(out, "{line}");
                let _ = out.flush();
            }
            Sink::Capture(lines) => lines.push(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CpuEvent, IoEvent};

    fn cpu(event: CpuEvent, pid: i64, remaining: i64) -> CpuRecord {
        CpuRecord {
            event,
            pid,
            name: format!("P{pid}"),
            remaining,
            ready_queue: 0,
            context_switch: false,
        }
    }

    #[test]
    fn test_flush_all_orders_by_tick() {
        let collector = MetricsCollector::new();
        collector.enable_capture();
        collector.log_cpu(5, cpu(CpuEvent::Exec, 1, 2));
        collector.log_cpu(1, cpu(CpuEvent::Exec, 1, 6));
        collector.log_cpu(3, cpu(CpuEvent::Exec, 1, 4));
        collector.flush_all();

        let ticks: Vec<u64> = collector
            .captured_lines()
            .iter()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["tick"]
                .as_u64()
                .unwrap())
            .collect();
        assert_eq!(ticks, vec![1, 3, 5]);
    }

    #[test]
    fn test_singleton_overwrite_and_transition_accumulation() {
        let collector = MetricsCollector::new();
        collector.enable_capture();
        collector.log_cpu(0, cpu(CpuEvent::Exec, 1, 3));
        collector.log_cpu(0, cpu(CpuEvent::Complete, 1, 0));
        collector.log_transition(
            0,
            TransitionRecord {
                pid: 1,
                name: "P1".into(),
                from: "READY".into(),
                to: "RUNNING".into(),
                reason: "dispatched".into(),
            },
        );
        collector.log_transition(
            0,
            TransitionRecord {
                pid: 1,
                name: "P1".into(),
                from: "RUNNING".into(),
                to: "TERMINATED".into(),
                reason: "completed".into(),
            },
        );
        collector.flush_all();

        let lines = collector.captured_lines();
        assert_eq!(lines.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(v["cpu"]["event"], "COMPLETE");
        assert_eq!(v["state_transitions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_disabled_sink_swallows_output() {
        let collector = MetricsCollector::new();
        assert!(!collector.is_enabled());
        collector.log_cpu(0, cpu(CpuEvent::Idle, -1, 0));
        collector.flush_all();
        assert!(collector.captured_lines().is_empty());
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let collector = MetricsCollector::new();
        collector.enable_file(&path).unwrap();
        collector.log_io(
            2,
            IoRecord {
                device: "disk".into(),
                event: IoEvent::Step,
                pid: 4,
                name: "P4".into(),
                remaining: 1,
                queue: 0,
            },
        );
        collector.flush_all();
        collector.log_memory_summary(3, 1, 4, 2, "FIFO");
        collector.disable();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["io"]["device"], "disk");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["summary"], "MEMORY_METRICS");
        assert_eq!(second["frame_utilization"], 50.0);
    }

    #[test]
    fn test_empty_tick_is_not_emitted() {
        let collector = MetricsCollector::new();
        collector.enable_capture();
        // Touch the tick without recording anything observable.
        collector.flush_tick(7);
        collector.flush_all();
        assert!(collector.captured_lines().is_empty());
    }
}
