//! Engine errors
//!
//! Everything here is fatal: configuration and workload problems are
//! rejected before the engine starts, and backpressure is modelled as
//! state, so an `Err` from the engine always means a broken invariant.

use core_types::{Pid, Tick};
use io_bank::IoBankError;
use memory_manager::MemoryError;
use thiserror::Error;

/// Fatal simulation failures
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Io(#[from] IoBankError),

    #[error("terminated process {pid} found in ready queue at tick {tick}")]
    TerminatedInReadyQueue { pid: Pid, tick: Tick },

    #[error("unknown pid {pid} at tick {tick}")]
    UnknownPid { pid: Pid, tick: Tick },

    #[error("process {pid} has no burst to run at tick {tick}")]
    NoBurst { pid: Pid, tick: Tick },

    #[error("invariant violated at tick {tick}: {detail}")]
    Invariant { tick: Tick, detail: String },
}
