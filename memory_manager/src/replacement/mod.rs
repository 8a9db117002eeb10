//! Replacement policies
//!
//! A policy ranks eviction candidates from the current frame table and
//! is told when frames load and release so it can keep its own
//! bookkeeping. Policies never mutate frames or page tables.

mod fifo;
mod lru;
mod nru;
mod optimal;

pub use fifo::FifoReplacement;
pub use lru::LruReplacement;
pub use nru::NruReplacement;
pub use optimal::OptimalReplacement;

use core_types::{Frame, FrameId, ProcessTable, ReplacementAlgorithm, Tick};

/// Victim-selection contract
pub trait ReplacementPolicy: Send {
    /// Picks a frame to evict, or `None` when every candidate is
    /// pinned and the caller must wait
    fn select_victim(
        &mut self,
        frames: &[Frame],
        table: &ProcessTable,
        now: Tick,
    ) -> Option<FrameId>;

    /// A page finished loading into `frame`
    fn on_frame_loaded(&mut self, frame: FrameId);

    /// `frame` was evicted or freed
    fn on_frame_released(&mut self, frame: FrameId);

    /// The policy this object implements
    fn algorithm(&self) -> ReplacementAlgorithm;
}

/// Builds the policy object for a configured algorithm
pub fn make_replacement_policy(algorithm: ReplacementAlgorithm) -> Box<dyn ReplacementPolicy> {
    match algorithm {
        ReplacementAlgorithm::Fifo => Box::new(FifoReplacement::new()),
        ReplacementAlgorithm::Lru => Box::new(LruReplacement::new()),
        ReplacementAlgorithm::Optimal => Box::new(OptimalReplacement::new()),
        ReplacementAlgorithm::Nru => Box::new(NruReplacement::new()),
    }
}

/// True when `frame` cannot be evicted right now
///
/// The reference bit is the pin. It is set when a page loads and when
/// the owner is gated onto the CPU, and cleared whenever the owner
/// stops running, so a restored process keeps its working set just
/// long enough to dispatch. A working set larger than the frame table
/// can therefore wait indefinitely; that is backpressure, not an
/// error.
pub fn frame_is_pinned(frame: &Frame, table: &ProcessTable) -> bool {
    let Some((pid, page)) = frame.owner else {
        return false;
    };
    let Some(process) = table.get(pid) else {
        return false;
    };
    process
        .page_table
        .get(page)
        .map(|entry| entry.referenced)
        .unwrap_or(false)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use core_types::{Pid, ProcessState};

    #[test]
    fn test_pin_follows_the_reference_bit() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::Ready, &[(0, 0, 0)]);
        let f = frame(0, 1, 0);

        assert!(!frame_is_pinned(&f, &table));
        table.get_mut(Pid(1)).unwrap().page_table[0].referenced = true;
        assert!(frame_is_pinned(&f, &table));
        table.get_mut(Pid(1)).unwrap().page_table[0].referenced = false;
        assert!(!frame_is_pinned(&f, &table));
    }

    #[test]
    fn test_empty_frame_is_never_pinned() {
        let table = ProcessTable::new();
        let f = Frame::new(0);
        assert!(!frame_is_pinned(&f, &table));
    }
}
