//! Device bank scenarios

use core_types::{Burst, IoSchedulingAlgorithm, SchedulingAlgorithm, SimConfig};
use tests_scenarios::*;

#[test]
fn fcfs_disk_serves_three_requests_serially() {
    let (mut engine, _metrics) = engine_with(SimConfig::default());
    engine.load(vec![
        proc_with(1, 0, vec![Burst::io_on(5, "disk")], 0, 0),
        proc_with(2, 1, vec![Burst::io_on(3, "disk")], 0, 0),
        proc_with(3, 2, vec![Burst::io_on(4, "disk")], 0, 0),
    ]);
    run_validated(&mut engine).unwrap();

    assert_eq!(completion_of(&engine, 1), 5);
    assert_eq!(completion_of(&engine, 2), 8);
    assert_eq!(completion_of(&engine, 3), 12);

    let disk = engine.io_bank().device("disk").unwrap();
    assert_eq!(disk.device_switches(), 3);
    assert_eq!(disk.completions(), 3);
    assert_eq!(disk.busy_ticks(), 12);
}

#[test]
fn device_round_robin_interleaves_requests() {
    let (mut engine, _metrics) = engine_with(SimConfig {
        io_scheduling_algorithm: IoSchedulingAlgorithm::RoundRobin,
        io_quantum: 2,
        ..SimConfig::default()
    });
    engine.load(vec![
        proc_with(1, 0, vec![Burst::io_on(4, "disk")], 0, 0),
        proc_with(2, 0, vec![Burst::io_on(2, "disk")], 0, 0),
    ]);
    run_validated(&mut engine).unwrap();

    // P1 serves two sub-ticks, rotates out, P2 finishes, P1 resumes:
    // the short request overtakes the long one.
    assert!(completion_of(&engine, 2) < completion_of(&engine, 1));
    assert_eq!(completion_of(&engine, 1), 6);
}

#[test]
fn named_devices_run_in_parallel() {
    let (mut engine, _metrics) = engine_with(SimConfig::default());
    engine.load(vec![
        proc_with(1, 0, vec![Burst::io_on(4, "disk")], 0, 0),
        proc_with(2, 0, vec![Burst::io_on(4, "net0")], 0, 0),
    ]);
    run_validated(&mut engine).unwrap();

    // Different devices serve concurrently; neither waits on the other.
    assert_eq!(completion_of(&engine, 1), 4);
    assert_eq!(completion_of(&engine, 2), 4);
    assert!(engine.io_bank().has_device("net0"));
}

#[test]
fn io_completion_requeues_process_for_more_cpu() {
    let (mut engine, _metrics) = engine_with(SimConfig::default());
    engine.load(vec![proc_with(
        1,
        0,
        vec![Burst::cpu(2), Burst::io(3), Burst::cpu(2)],
        0,
        0,
    )]);
    run_validated(&mut engine).unwrap();

    // 2 CPU + 3 I/O + 2 CPU with no competition: completion at 7,
    // waiting 0.
    assert_eq!(completion_of(&engine, 1), 7);
    assert_eq!(waiting_of(&engine, 1), 0);
    assert!((engine.cpu_utilization() - (4.0 / 7.0 * 100.0)).abs() < 1e-9);
}

#[test]
fn io_completion_preempts_under_round_robin() {
    let (mut engine, metrics) = engine_with(SimConfig {
        scheduling_algorithm: SchedulingAlgorithm::RoundRobin,
        quantum: 8,
        ..SimConfig::default()
    });
    engine.load(vec![
        proc_with(1, 0, vec![Burst::io(2), Burst::cpu(1)], 0, 0),
        cpu_proc(2, 0, 10),
    ]);
    run_validated(&mut engine).unwrap();

    // P1's I/O completes inside P2's quantum and bumps it off the CPU.
    assert_eq!(completion_of(&engine, 1), 3);
    assert_eq!(completion_of(&engine, 2), 11);

    let values = trace_values(&metrics);
    let p2_preempted = values
        .iter()
        .any(|v| v["cpu"]["event"] == "PREEMPT" && v["cpu"]["pid"] == 2);
    assert!(p2_preempted);
}

#[test]
fn io_only_workload_leaves_cpu_idle() {
    let (mut engine, metrics) = engine_with(SimConfig::default());
    engine.load(vec![proc_with(1, 0, vec![Burst::io(3)], 0, 0)]);
    run_validated(&mut engine).unwrap();

    assert_eq!(completion_of(&engine, 1), 3);
    assert!((engine.cpu_utilization() - 0.0).abs() < 1e-9);

    let values = trace_values(&metrics);
    assert!(values.iter().any(|v| v["cpu"]["event"] == "IDLE"));
    assert!(values.iter().any(|v| v["io"]["event"] == "COMPLETED"));
}
