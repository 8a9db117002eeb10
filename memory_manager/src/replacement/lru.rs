//! Least-recently-used replacement
//!
//! The victim is the unpinned frame whose page has the smallest
//! `last_access` tick. Access times are written by the manager when a
//! page loads, so this is LRU over load/pin history, not over
//! per-instruction accesses (the simulator has none).

use super::{frame_is_pinned, ReplacementPolicy};
use core_types::{Frame, FrameId, ProcessTable, ReplacementAlgorithm, Tick};

#[derive(Debug, Default)]
pub struct LruReplacement;

impl LruReplacement {
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruReplacement {
    fn select_victim(
        &mut self,
        frames: &[Frame],
        table: &ProcessTable,
        _now: Tick,
    ) -> Option<FrameId> {
        let mut victim: Option<(FrameId, Tick)> = None;
        for frame in frames {
            let Some((pid, page)) = frame.owner else {
                continue;
            };
            if frame_is_pinned(frame, table) {
                continue;
            }
            let Some(entry) = table.get(pid).and_then(|p| p.page_table.get(page)) else {
                continue;
            };
            if victim.map(|(_, t)| entry.last_access < t).unwrap_or(true) {
                victim = Some((frame.id, entry.last_access));
            }
        }
        victim.map(|(id, _)| id)
    }

    fn on_frame_loaded(&mut self, _frame: FrameId) {}

    fn on_frame_released(&mut self, _frame: FrameId) {}

    fn algorithm(&self) -> ReplacementAlgorithm {
        ReplacementAlgorithm::Lru
    }
}
