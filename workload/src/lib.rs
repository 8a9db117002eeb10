//! # Workload
//!
//! Parsers for the two text inputs: the workload file (one process per
//! line) and the `key=value` configuration file.
//!
//! ## Error posture
//!
//! Configuration problems abort before the simulator starts. Workload
//! problems are softer: a malformed line is skipped with a
//! line-numbered diagnostic, and only a workload with zero valid
//! processes is fatal.

pub mod config;
pub mod parser;

pub use config::{load_config_file, parse_config_str, ConfigError};
pub use parser::{
    load_workload_file, parse_process_line, parse_workload_str, Diagnostic, WorkloadError,
};
