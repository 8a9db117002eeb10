//! State-approximate optimal replacement
//!
//! Evicts the memory least likely to be touched soon, judged from
//! process states rather than a future-knowledge oracle:
//!
//! 1. frames of TERMINATED owners,
//! 2. frames of IO_WAITING owners, preferring the largest remaining
//!    I/O time,
//! 3. any other unpinned frame.

use super::{frame_is_pinned, ReplacementPolicy};
use core_types::{BurstKind, Frame, FrameId, ProcessState, ProcessTable, ReplacementAlgorithm, Tick};

#[derive(Debug, Default)]
pub struct OptimalReplacement;

impl OptimalReplacement {
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for OptimalReplacement {
    fn select_victim(
        &mut self,
        frames: &[Frame],
        table: &ProcessTable,
        _now: Tick,
    ) -> Option<FrameId> {
        let mut terminated: Option<FrameId> = None;
        let mut io_waiting: Option<(FrameId, u64)> = None;
        let mut unblocked: Option<FrameId> = None;

        for frame in frames {
            let Some((pid, _)) = frame.owner else {
                continue;
            };
            // An owner missing from the arena was released already.
            let Some(process) = table.get(pid) else {
                return Some(frame.id);
            };
            if frame_is_pinned(frame, table) {
                continue;
            }
            match process.state {
                ProcessState::Terminated => {
                    terminated.get_or_insert(frame.id);
                }
                ProcessState::IoWaiting => {
                    let remaining = process
                        .current_burst()
                        .filter(|b| b.kind == BurstKind::Io)
                        .map(|b| b.remaining)
                        .unwrap_or(0);
                    if io_waiting.map(|(_, r)| remaining > r).unwrap_or(true) {
                        io_waiting = Some((frame.id, remaining));
                    }
                }
                _ => {
                    unblocked.get_or_insert(frame.id);
                }
            }
        }

        terminated
            .or(io_waiting.map(|(id, _)| id))
            .or(unblocked)
    }

    fn on_frame_loaded(&mut self, _frame: FrameId) {}

    fn on_frame_released(&mut self, _frame: FrameId) {}

    fn algorithm(&self) -> ReplacementAlgorithm {
        ReplacementAlgorithm::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use core_types::{Pid, ProcessState};

    #[test]
    fn test_terminated_owner_preferred() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::Ready, &[(0, 0, 0)]);
        resident_proc(&mut table, 2, ProcessState::Terminated, &[(0, 1, 0)]);
        let frames = vec![frame(0, 1, 0), frame(1, 2, 0)];

        let mut policy = OptimalReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), Some(1));
    }

    #[test]
    fn test_longest_remaining_io_among_waiters() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::IoWaiting, &[(0, 0, 0)]);
        resident_proc(&mut table, 2, ProcessState::IoWaiting, &[(0, 1, 0)]);
        // Replace the schedules so the current bursts are I/O with
        // different remaining times.
        table.get_mut(Pid(1)).unwrap().bursts = vec![core_types::Burst::io(3)];
        table.get_mut(Pid(2)).unwrap().bursts = vec![core_types::Burst::io(9)];
        let frames = vec![frame(0, 1, 0), frame(1, 2, 0)];

        let mut policy = OptimalReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), Some(1));
    }

    #[test]
    fn test_falls_back_to_unblocked() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::Ready, &[(0, 0, 0)]);
        let frames = vec![frame(0, 1, 0)];

        let mut policy = OptimalReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), Some(0));
    }

    #[test]
    fn test_pinned_running_pages_survive() {
        let mut table = ProcessTable::new();
        resident_proc(&mut table, 1, ProcessState::Running, &[(0, 0, 0)]);
        table.get_mut(Pid(1)).unwrap().page_table[0].referenced = true;
        let frames = vec![frame(0, 1, 0)];

        let mut policy = OptimalReplacement::new();
        assert_eq!(policy.select_victim(&frames, &table, 0), None);
    }
}
