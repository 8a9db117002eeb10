//! Shared fixtures for the end-to-end test suite
//!
//! The helpers build engines with an in-memory trace capture so tests
//! can assert on both the final process records and the emitted JSON
//! lines.

use core_types::{Burst, Pid, Process, SimConfig, Tick};
use metrics::MetricsCollector;
use sim_engine::{SimEngine, SimError};
use std::sync::Arc;

/// Engine plus its capturing collector
pub fn engine_with(config: SimConfig) -> (SimEngine, Arc<MetricsCollector>) {
    let metrics = Arc::new(MetricsCollector::new());
    metrics.enable_capture();
    let engine = SimEngine::new(config, Arc::clone(&metrics));
    (engine, metrics)
}

/// A single-CPU-burst process
pub fn cpu_proc(pid: u32, arrival: Tick, burst: u64) -> Process {
    cpu_proc_prio(pid, arrival, burst, 0)
}

/// A single-CPU-burst process with a priority
pub fn cpu_proc_prio(pid: u32, arrival: Tick, burst: u64, priority: i32) -> Process {
    Process::new(
        Pid(pid),
        format!("P{pid}"),
        arrival,
        vec![Burst::cpu(burst)],
        priority,
        0,
    )
}

/// A process with an arbitrary schedule and page count
pub fn proc_with(
    pid: u32,
    arrival: Tick,
    bursts: Vec<Burst>,
    priority: i32,
    pages: usize,
) -> Process {
    Process::new(Pid(pid), format!("P{pid}"), arrival, bursts, priority, pages)
}

/// Runs to completion, checking the §8 invariants after every step
pub fn run_validated(engine: &mut SimEngine) -> Result<(), SimError> {
    let quantum = match engine.config().scheduling_algorithm {
        core_types::SchedulingAlgorithm::RoundRobin => engine.config().quantum,
        _ => 0,
    };
    while engine.step(quantum)? {
        engine.validate()?;
    }
    engine.validate()
}

/// Completion tick of one process, panicking if it never finished
pub fn completion_of(engine: &SimEngine, pid: u32) -> Tick {
    engine
        .processes()
        .get(Pid(pid))
        .and_then(|p| p.completion)
        .unwrap_or_else(|| panic!("P{pid} did not complete"))
}

/// Waiting time of one terminated process
pub fn waiting_of(engine: &SimEngine, pid: u32) -> u64 {
    engine
        .processes()
        .get(Pid(pid))
        .and_then(|p| p.waiting)
        .unwrap_or_else(|| panic!("P{pid} did not complete"))
}

/// Parses every captured trace line as JSON
pub fn trace_values(metrics: &MetricsCollector) -> Vec<serde_json::Value> {
    metrics.flush_all();
    metrics
        .captured_lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("trace line is valid JSON"))
        .collect()
}
