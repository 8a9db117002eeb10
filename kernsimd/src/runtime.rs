//! Runtime assembly and reporting

use crate::demos::{all_demos, Demo};
use core_types::{ProcessState, ProcessTable, SimConfig};
use metrics::{MetricsCollector, SinkError};
use sim_engine::{SimEngine, SimError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use workload::{load_config_file, load_workload_file, ConfigError, WorkloadError};

/// Default trace path when `-m` is given without one
pub const DEFAULT_METRICS_PATH: &str = "data/resultados/metrics.jsonl";

/// Where the trace goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsMode {
    Disabled,
    File(PathBuf),
}

/// Resolved command-line options
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub workload_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub metrics: MetricsMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workload_path: None,
            config_path: None,
            metrics: MetricsMode::Disabled,
        }
    }
}

/// Anything that stops a run
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Workload(#[from] WorkloadError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("no valid processes in the workload")]
    NoProcesses,
}

/// The assembled runtime
pub struct SimRuntime {
    options: RuntimeConfig,
    sim_config: SimConfig,
    metrics: Arc<MetricsCollector>,
}

impl SimRuntime {
    /// Loads the configuration and opens the trace sink
    pub fn new(options: RuntimeConfig) -> Result<Self, RuntimeError> {
        let sim_config = match &options.config_path {
            Some(path) => load_config_file(path)?,
            None => SimConfig::default(),
        };

        let metrics = Arc::new(MetricsCollector::new());
        if let MetricsMode::File(path) = &options.metrics {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(SinkError::Open)?;
                }
            }
            metrics.enable_file(path)?;
        }

        Ok(Self {
            options,
            sim_config,
            metrics,
        })
    }

    /// Runs the workload file, or the built-in demos without one
    ///
    /// The trace is flushed before returning on both paths, success or
    /// failure.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let result = self.run_inner();
        self.metrics.flush_all();
        result
    }

    fn run_inner(&mut self) -> Result<(), RuntimeError> {
        match self.options.workload_path.clone() {
            Some(path) => {
                let (processes, diagnostics) = load_workload_file(&path)?;
                for diagnostic in &diagnostics {
                    eprintln!(
                        "warning: {}:{}: {}",
                        path.display(),
                        diagnostic.line,
                        diagnostic.message
                    );
                }
                if processes.is_empty() {
                    return Err(RuntimeError::NoProcesses);
                }

                let mut engine =
                    SimEngine::new(self.sim_config.clone(), Arc::clone(&self.metrics));
                engine.load(processes);
                print_header(self.sim_config.scheduling_algorithm.as_str());
                engine.run()?;
                print_results(&engine);
                engine.emit_summaries();
                Ok(())
            }
            None => {
                for demo in all_demos() {
                    self.run_demo(demo)?;
                }
                Ok(())
            }
        }
    }

    fn run_demo(&mut self, demo: Demo) -> Result<(), RuntimeError> {
        let mut engine = SimEngine::new(demo.config, Arc::clone(&self.metrics));
        engine.load(demo.processes);
        print_header(demo.title);
        engine.run()?;
        print_results(&engine);
        engine.emit_summaries();
        Ok(())
    }
}

fn print_header(title: &str) {
    println!();
    println!("========================================");
    println!("  {title}");
    println!("========================================");
    println!();
}

fn print_results(engine: &SimEngine) {
    print_process_table(engine.processes());
    println!();
    println!("Average Waiting Time:    {:.2}", engine.average_waiting_time());
    println!(
        "Average Turnaround Time: {:.2}",
        engine.average_turnaround_time()
    );
    println!(
        "Average Response Time:   {:.2}",
        engine.average_response_time()
    );
    println!("CPU Utilization:         {:.2}%", engine.cpu_utilization());
    println!("Context Switches:        {}", engine.context_switches());
    println!("Total Time:              {}", engine.current_time());
    if engine.memory().total_page_faults() > 0 {
        println!(
            "Page Faults:             {}",
            engine.memory().total_page_faults()
        );
        println!(
            "Page Replacements:       {}",
            engine.memory().total_replacements()
        );
    }
}

fn print_process_table(processes: &ProcessTable) {
    println!(
        "{:<6}{:<12}{:<10}{:<10}{:<12}{:<10}{:<12}{:<10}",
        "PID", "Name", "Arrival", "Burst", "Completion", "Waiting", "Turnaround", "Response"
    );
    println!("{}", "-".repeat(82));
    for process in processes.iter() {
        if process.state != ProcessState::Terminated {
            continue;
        }
        let service = process.total_cpu_time() + process.total_io_time();
        println!(
            "{:<6}{:<12}{:<10}{:<10}{:<12}{:<10}{:<12}{:<10}",
            process.pid,
            process.name,
            process.arrival,
            service,
            process.completion.unwrap_or(0),
            process.waiting.unwrap_or(0),
            process.turnaround.unwrap_or(0),
            process.response.unwrap_or(0),
        );
    }
}
