//! Memory subsystem errors
//!
//! Only invariant violations are errors; a page that cannot load yet
//! because every candidate frame is pinned is backpressure, not a
//! failure.

use core_types::{Pid, Tick};
use thiserror::Error;

/// Fatal invariant violations in the paging machinery
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("replacement policy returned frame {frame} out of range at tick {tick}")]
    VictimOutOfRange { frame: usize, tick: Tick },

    #[error("page load refers to unknown process {pid} at tick {tick}")]
    UnknownProcess { pid: Pid, tick: Tick },
}
