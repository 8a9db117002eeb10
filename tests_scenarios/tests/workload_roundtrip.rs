//! Text inputs driving full runs

use core_types::SchedulingAlgorithm;
use metrics::MetricsCollector;
use sim_engine::SimEngine;
use std::sync::Arc;
use tests_scenarios::{completion_of, run_validated};
use workload::{parse_config_str, parse_workload_str};

#[test]
fn parsed_workload_matches_the_programmatic_run() {
    let (processes, diagnostics) = parse_workload_str(
        "\
# classic FCFS batch
P1 0 CPU(8)
P2 1 CPU(4)
P3 2 CPU(9)
P4 3 CPU(5)
",
    );
    assert!(diagnostics.is_empty());

    let config = parse_config_str("scheduling_algorithm = FCFS\n").unwrap();
    let mut engine = SimEngine::new(config, Arc::new(MetricsCollector::new()));
    engine.load(processes);
    run_validated(&mut engine).unwrap();

    assert_eq!(completion_of(&engine, 1), 8);
    assert_eq!(completion_of(&engine, 2), 12);
    assert_eq!(completion_of(&engine, 3), 21);
    assert_eq!(completion_of(&engine, 4), 26);
    assert!((engine.average_waiting_time() - 8.75).abs() < 1e-9);
}

#[test]
fn config_quantum_reaches_the_scheduler() {
    let (processes, _) = parse_workload_str("P1 0 CPU(10)\nP2 1 CPU(8)\nP3 2 CPU(6)\nP4 3 CPU(4)\n");
    let config = parse_config_str("scheduling_algorithm = RoundRobin\nquantum = 4\n").unwrap();
    assert_eq!(config.scheduling_algorithm, SchedulingAlgorithm::RoundRobin);

    let mut engine = SimEngine::new(config, Arc::new(MetricsCollector::new()));
    engine.load(processes);
    run_validated(&mut engine).unwrap();

    assert_eq!(engine.current_time(), 28);
    assert!(engine.context_switches() >= 6);
}

#[test]
fn io_tokens_create_their_devices() {
    let (processes, diagnostics) =
        parse_workload_str("P1 0 CPU(1),E/S(3),CPU(1)\nP2 0 E/S(2,net0)\n");
    assert!(diagnostics.is_empty());

    let mut engine = SimEngine::new(Default::default(), Arc::new(MetricsCollector::new()));
    engine.load(processes);
    run_validated(&mut engine).unwrap();

    assert!(engine.io_bank().has_device("disk"));
    assert!(engine.io_bank().has_device("net0"));
    assert_eq!(engine.io_bank().device("net0").unwrap().completions(), 1);
}

#[test]
fn bad_lines_do_not_poison_the_run() {
    let (processes, diagnostics) = parse_workload_str(
        "\
P1 0 CPU(2)
this is not a process
P2 0 CPU(0)
P3 1 CPU(3)
",
    );
    assert_eq!(processes.len(), 2);
    assert_eq!(diagnostics.len(), 2);

    let mut engine = SimEngine::new(Default::default(), Arc::new(MetricsCollector::new()));
    engine.load(processes);
    run_validated(&mut engine).unwrap();
    assert_eq!(completion_of(&engine, 1), 2);
    assert_eq!(completion_of(&engine, 3), 5);
}
