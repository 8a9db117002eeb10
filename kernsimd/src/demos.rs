//! Built-in demo workloads
//!
//! Run when no workload file is given: one classic scenario per
//! scheduling policy, small enough to eyeball in the results table.

use core_types::{Burst, Pid, Process, SchedulingAlgorithm, SimConfig};

/// One named demo scenario
pub struct Demo {
    pub title: &'static str,
    pub config: SimConfig,
    pub processes: Vec<Process>,
}

fn cpu_proc(pid: u32, arrival: u64, burst: u64, priority: i32) -> Process {
    Process::new(
        Pid(pid),
        format!("P{pid}"),
        arrival,
        vec![Burst::cpu(burst)],
        priority,
        0,
    )
}

/// The demo set, in presentation order
pub fn all_demos() -> Vec<Demo> {
    vec![
        Demo {
            title: "FCFS (First Come First Served)",
            config: SimConfig {
                scheduling_algorithm: SchedulingAlgorithm::Fcfs,
                ..SimConfig::default()
            },
            processes: vec![
                cpu_proc(1, 0, 8, 0),
                cpu_proc(2, 1, 4, 0),
                cpu_proc(3, 2, 9, 0),
                cpu_proc(4, 3, 5, 0),
            ],
        },
        Demo {
            title: "SJF (Shortest Job First)",
            config: SimConfig {
                scheduling_algorithm: SchedulingAlgorithm::Sjf,
                ..SimConfig::default()
            },
            processes: vec![
                cpu_proc(1, 0, 8, 0),
                cpu_proc(2, 1, 4, 0),
                cpu_proc(3, 2, 2, 0),
                cpu_proc(4, 3, 1, 0),
            ],
        },
        Demo {
            title: "Round Robin (Quantum = 4)",
            config: SimConfig {
                scheduling_algorithm: SchedulingAlgorithm::RoundRobin,
                quantum: 4,
                ..SimConfig::default()
            },
            processes: vec![
                cpu_proc(1, 0, 10, 0),
                cpu_proc(2, 1, 8, 0),
                cpu_proc(3, 2, 6, 0),
                cpu_proc(4, 3, 4, 0),
            ],
        },
        Demo {
            title: "Priority (lower number = stronger)",
            config: SimConfig {
                scheduling_algorithm: SchedulingAlgorithm::Priority,
                ..SimConfig::default()
            },
            processes: vec![
                cpu_proc(1, 0, 8, 3),
                cpu_proc(2, 1, 4, 1),
                cpu_proc(3, 2, 9, 4),
                cpu_proc(4, 3, 5, 2),
            ],
        },
    ]
}
