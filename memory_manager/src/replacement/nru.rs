//! Not-recently-used replacement
//!
//! Unpinned frames partition into four classes by the page's
//! `(referenced, dirty)` bits; the victim is drawn uniformly from the
//! lowest non-empty class in the order (0,0), (0,1), (1,0), (1,1).
//! The draw uses a policy-owned xorshift generator with a fixed seed
//! so identical runs produce identical traces.

use super::{frame_is_pinned, ReplacementPolicy};
use core_types::{Frame, FrameId, ProcessTable, ReplacementAlgorithm, Tick};

const SEED: u64 = 0x9E3779B97F4A7C15;

#[derive(Debug)]
pub struct NruReplacement {
    rng_state: u64,
}

impl NruReplacement {
    pub fn new() -> Self {
        Self { rng_state: SEED }
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }
}

impl Default for NruReplacement {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for NruReplacement {
    fn select_victim(
        &mut self,
        frames: &[Frame],
        table: &ProcessTable,
        _now: Tick,
    ) -> Option<FrameId> {
        let mut classes: [Vec<FrameId>; 4] = [Vec::new(), Vec::new(), Vec::new(), Vec::new()];

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
            let class = (entry.referenced as usize) * 2 + entry.dirty as usize;
            classes[class].push(frame.id);
        }

        for class in &classes {
            if !class.is_empty() {
                let idx = (self.next_u64() % class.len() as u64) as usize;
                return Some(class[idx]);
            }
        }
        None
    }

    fn on_frame_loaded(&mut self, _frame: FrameId) {}

    fn on_frame_released(&mut self, _frame: FrameId) {}

    fn algorithm(&self) -> ReplacementAlgorithm {
        ReplacementAlgorithm::Nru
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use core_types::{Pid, ProcessState};

    #[test]
    fn test_lowest_class_wins() {
        let mut table = ProcessTable::new();
        resident_proc(
            &mut table,
            1,
            ProcessState::Ready,
            &[(0, 0, 0), (1, 1, 0), (2, 2, 0)],
        );
        {
            let p = table.get_mut(Pid(1)).unwrap();
            p.page_table[0].referenced = true; // class (1,0)
            p.page_table[1].dirty = true; // class (0,1)
                                          // page 2 stays class (0,0)
        }
        let frames = vec![frame(0, 1, 0), frame(1, 1, 1), frame(2, 1, 2)];

        let mut policy = NruReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), Some(2));
    }

    #[test]
    fn test_referenced_pages_are_pinned() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::Ready, &[(0, 0, 0)]);
        table.get_mut(Pid(1)).unwrap().page_table[0].referenced = true;
        let frames = vec![frame(0, 1, 0)];

        let mut policy = NruReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), None);
    }

    #[test]
    fn test_dirty_split_within_unreferenced() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::Ready, &[(0, 0, 0), (1, 1, 0)]);
        table.get_mut(Pid(1)).unwrap().page_table[0].dirty = true;
        let frames = vec![frame(0, 1, 0), frame(1, 1, 1)];

        // Clean class (0,0) is drawn before dirty class (0,1).
        let mut policy = NruReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), Some(1));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let mut table = ProcessTable::new();
        resident_proc(
            &mut table,
            1,
            ProcessState::Ready,
            &[(0, 0, 0), (1, 1, 0), (2, 2, 0)],
        );
        let frames = vec![frame(0, 1, 0), frame(1, 1, 1), frame(2, 1, 2)];

        let pick_a = NruReplacement::new().select_victim(&frames, &table, 0);
        let pick_b = NruReplacement::new().select_victim(&frames, &table, 0);
        assert_eq!(pick_a, pick_b);
    }
}
