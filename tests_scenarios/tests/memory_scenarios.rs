//! Demand-paging scenarios

use core_types::{Burst, Pid, ProcessState, ReplacementAlgorithm, SimConfig};
use tests_scenarios::*;

fn paged_config(frames: usize, algorithm: ReplacementAlgorithm) -> SimConfig {
    SimConfig {
        total_memory_frames: frames,
        page_replacement_algorithm: algorithm,
        ..SimConfig::default()
    }
}

#[test]
fn pages_fault_once_each_and_pin_for_the_run() {
    let (mut engine, metrics) = engine_with(paged_config(3, ReplacementAlgorithm::Fifo));
    engine.load(vec![proc_with(1, 0, vec![Burst::cpu(1)], 0, 3)]);
    run_validated(&mut engine).unwrap();

    let process = engine.processes().get(Pid(1)).unwrap();
    assert_eq!(process.page_faults, 3);
    assert_eq!(engine.memory().total_page_faults(), 3);
    assert_eq!(engine.memory().total_replacements(), 0);
    // Loads serialise at one per sub-tick: ready at tick 3, runs tick
    // 3, completes at 4.
    assert_eq!(completion_of(&engine, 1), 4);
    // Termination released every frame.
    assert_eq!(engine.memory().used_frames(), 0);

    let values = trace_values(&metrics);
    assert!(values.iter().any(|v| v["memory"]["event"] == "PAGE_FAULT"));
    assert!(values.iter().any(|v| v["memory"]["event"] == "PAGE_LOADED"));
}

#[test]
fn fault_latency_delays_the_first_dispatch() {
    let config = SimConfig {
        page_fault_latency: 3,
        ..paged_config(2, ReplacementAlgorithm::Fifo)
    };
    let (mut engine, _metrics) = engine_with(config);
    engine.load(vec![proc_with(1, 0, vec![Burst::cpu(2)], 0, 2)]);
    run_validated(&mut engine).unwrap();

    // Two loads at latency 3 finish at tick 6; the burst runs 6..8.
    assert_eq!(completion_of(&engine, 1), 8);
    assert_eq!(engine.processes().get(Pid(1)).unwrap().page_faults, 2);
}

#[test]
fn eviction_targets_unpinned_pages_of_blocked_processes() {
    let (mut engine, metrics) = engine_with(paged_config(1, ReplacementAlgorithm::Fifo));
    engine.load(vec![
        proc_with(1, 0, vec![Burst::cpu(1), Burst::io(5)], 0, 1),
        proc_with(2, 0, vec![Burst::cpu(1)], 0, 1),
    ]);
    run_validated(&mut engine).unwrap();

    // P1 runs first, then blocks on I/O with its pin cleared; P2's
    // pending load evicts P1's only page.
    assert_eq!(engine.memory().total_page_faults(), 2);
    assert_eq!(engine.memory().total_replacements(), 1);
    assert_eq!(engine.processes().get(Pid(1)).unwrap().replacements, 1);
    assert_eq!(completion_of(&engine, 2), 4);
    assert_eq!(completion_of(&engine, 1), 7);

    let values = trace_values(&metrics);
    let replaced = values
        .iter()
        .find(|v| v["memory"]["event"] == "PAGE_REPLACED")
        .expect("a PAGE_REPLACED record");
    assert_eq!(replaced["memory"]["pid"], 1);
}

#[test]
fn pinned_working_set_defers_competing_loads() {
    // One frame, two single-page processes with CPU-only work: the
    // second cannot load while the first's page is pinned, and
    // proceeds as soon as the frame frees on termination.
    let (mut engine, _metrics) = engine_with(paged_config(1, ReplacementAlgorithm::Fifo));
    engine.load(vec![
        proc_with(1, 0, vec![Burst::cpu(2)], 0, 1),
        proc_with(2, 0, vec![Burst::cpu(2)], 0, 1),
    ]);
    run_validated(&mut engine).unwrap();

    assert_eq!(engine.memory().total_replacements(), 0);
    assert!(completion_of(&engine, 1) < completion_of(&engine, 2));
    let total_faults = engine.memory().total_page_faults();
    assert_eq!(total_faults, 2);
}

#[test]
fn oversized_working_set_waits_indefinitely() {
    // Three pages on two frames can never satisfy the residency gate;
    // the process waits as backpressure, not as an error.
    let (mut engine, _metrics) = engine_with(paged_config(2, ReplacementAlgorithm::Fifo));
    engine.load(vec![proc_with(1, 0, vec![Burst::cpu(1)], 0, 3)]);

    let finished = engine.run_for(200).unwrap();
    assert!(!finished);
    let process = engine.processes().get(Pid(1)).unwrap();
    assert_eq!(process.state, ProcessState::MemoryWaiting);
    assert_eq!(process.page_faults, 3);
    assert_eq!(engine.memory().total_replacements(), 0);
}

#[test]
fn lru_evicts_the_oldest_load() {
    let (mut engine, metrics) = engine_with(paged_config(2, ReplacementAlgorithm::Lru));
    engine.load(vec![
        proc_with(1, 0, vec![Burst::cpu(1), Burst::io(8)], 0, 2),
        proc_with(2, 0, vec![Burst::cpu(1)], 0, 1),
    ]);
    run_validated(&mut engine).unwrap();

    // P1's two pages load at ticks 0 and 1; once P1 blocks on I/O its
    // pins clear and LRU takes the tick-0 page for P2.
    assert_eq!(engine.memory().total_replacements(), 1);
    let values = trace_values(&metrics);
    let replaced = values
        .iter()
        .find(|v| v["memory"]["event"] == "PAGE_REPLACED")
        .expect("a PAGE_REPLACED record");
    assert_eq!(replaced["memory"]["pid"], 1);
    assert_eq!(replaced["memory"]["page_id"], 0);
}

#[test]
fn frame_accounting_matches_page_tables_every_step() {
    let (mut engine, _metrics) = engine_with(paged_config(2, ReplacementAlgorithm::Fifo));
    engine.load(vec![
        proc_with(1, 0, vec![Burst::cpu(2), Burst::io(2), Burst::cpu(1)], 0, 2),
        proc_with(2, 1, vec![Burst::cpu(3)], 0, 1),
    ]);
    // run_validated re-checks invariant 3 (frames vs resident pages)
    // after every step.
    run_validated(&mut engine).unwrap();
    assert_eq!(engine.memory().used_frames(), 0);
}
