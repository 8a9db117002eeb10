//! # kernsimd
//!
//! Host driver for the simulator: argument handling, runtime assembly
//! from the two input files, built-in demo workloads, and the results
//! table printed after a run.
//!
//! ## Responsibilities
//!
//! The driver owns all terminal I/O. Engine components never print;
//! diagnostics go to standard error here, the results table to
//! standard output, and the trace to wherever `-m` pointed it.

pub mod demos;
pub mod runtime;

pub use runtime::{MetricsMode, RuntimeConfig, RuntimeError, SimRuntime, DEFAULT_METRICS_PATH};
