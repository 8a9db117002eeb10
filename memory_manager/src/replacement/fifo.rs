//! FIFO replacement with second chance by pin
//!
//! Frames queue in load order. The victim is the oldest unpinned
//! frame; pinned heads rotate to the tail so they pay for their
//! reprieve with a fresh position.

use super::{frame_is_pinned, ReplacementPolicy};
use core_types::{Frame, FrameId, ProcessTable, ReplacementAlgorithm, Tick};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct FifoReplacement {
    order: VecDeque<FrameId>,
}

impl FifoReplacement {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for FifoReplacement {
    fn select_victim(
        &mut self,
        frames: &[Frame],
        table: &ProcessTable,
        _now: Tick,
    ) -> Option<FrameId> {
        for _ in 0..self.order.len() {
            let candidate = *self.order.front()?;
            let frame = frames.get(candidate)?;
            if frame.occupied() && !frame_is_pinned(frame, table) {
                return Some(candidate);
            }
            self.order.rotate_left(1);
        }
        None
    }

    fn on_frame_loaded(&mut self, frame: FrameId) {
        if !self.order.contains(&frame) {
            self.order.push_back(frame);
        }
    }

    fn on_frame_released(&mut self, frame: FrameId) {
        self.order.retain(|&f| f != frame);
    }

    fn algorithm(&self) -> ReplacementAlgorithm {
        ReplacementAlgorithm::Fifo
    }
}
