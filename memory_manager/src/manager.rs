//! The memory manager
//!
//! Owns the frame table and a FIFO of page-load tasks served one at a
//! time with a fixed latency, simulating a single paging disk. A
//! process blocks on memory until every page of its table is resident;
//! the PIDs released by a call to [`MemoryManager::advance`] are
//! returned to the engine, which performs the READY transitions.

use crate::error::MemoryError;
use crate::replacement::{frame_is_pinned, make_replacement_policy, ReplacementPolicy};
use core_types::{
    Frame, FrameId, PageId, PageTableEntry, Pid, ProcessTable, ReplacementAlgorithm, Tick,
};
use metrics::{FrameStatusRecord, MemoryEvent, MemoryRecord, MetricsCollector, PageEntryRecord, PageTableRecord};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

/// One queued page load
#[derive(Debug, Clone)]
pub struct PageLoadTask {
    /// Owner of the page
    pub pid: Pid,
    /// Page to bring in
    pub page: PageId,
    /// Latency still to serve once the task is active
    pub remaining: u64,
    /// Frame reserved when the task started
    pub frame: Option<FrameId>,
}

/// Demand-paged memory manager
pub struct MemoryManager {
    algorithm: ReplacementAlgorithm,
    policy: Box<dyn ReplacementPolicy>,
    frames: Vec<Frame>,
    latency: u64,
    fault_queue: VecDeque<PageLoadTask>,
    active: Option<PageLoadTask>,
    pending: HashMap<Pid, BTreeSet<PageId>>,
    waiting: BTreeSet<Pid>,
    total_page_faults: u64,
    total_replacements: u64,
    metrics: Arc<MetricsCollector>,
}

impl MemoryManager {
    /// Creates a manager with `total_frames` empty frames
    pub fn new(
        total_frames: usize,
        algorithm: ReplacementAlgorithm,
        page_fault_latency: u64,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            algorithm,
            policy: make_replacement_policy(algorithm),
            frames: (0..total_frames).map(Frame::new).collect(),
            latency: page_fault_latency.max(1),
            fault_queue: VecDeque::new(),
            active: None,
            pending: HashMap::new(),
            waiting: BTreeSet::new(),
            total_page_faults: 0,
            total_replacements: 0,
            metrics,
        }
    }

    /// Builds the process's page table; called at admission
    pub fn register(&mut self, pid: Pid, table: &mut ProcessTable) {
        if let Some(process) = table.get_mut(pid) {
            if process.page_table.is_empty() && process.pages_required > 0 {
                process.page_table = (0..process.pages_required)
                    .map(PageTableEntry::new)
                    .collect();
            }
        }
    }

    /// Gate before a dispatch: true iff every page is resident
    ///
    /// On success the resident pages are pinned for the CPU. On a miss
    /// one load task is queued per missing page not already pending,
    /// each counted as a fault, and the process is recorded as waiting
    /// on memory.
    pub fn prepare_for_cpu(&mut self, pid: Pid, now: Tick, table: &mut ProcessTable) -> bool {
        let Some(process) = table.get_mut(pid) else {
            return false;
        };
        if process.page_table.is_empty() && process.pages_required > 0 {
            process.page_table = (0..process.pages_required)
                .map(PageTableEntry::new)
                .collect();
        }

        if process.page_table.iter().all(|entry| entry.resident) {
            for entry in process.page_table.iter_mut() {
                entry.referenced = true;
            }
            self.waiting.remove(&pid);
            return true;
        }

        let name = process.name.clone();
        let pending = self.pending.entry(pid).or_default();
        let missing: Vec<PageId> = process
            .page_table
            .iter()
            .filter(|entry| !entry.resident && !pending.contains(&entry.page_id))
            .map(|entry| entry.page_id)
            .collect();

        for page in missing {
            pending.insert(page);
            self.fault_queue.push_back(PageLoadTask {
                pid,
                page,
                remaining: self.latency,
                frame: None,
            });
            process.page_faults += 1;
            self.total_page_faults += 1;
            self.metrics.log_memory(
                now,
                MemoryRecord {
                    event: MemoryEvent::PageFault,
                    pid: i64::from(pid.0),
                    name: name.clone(),
                    page_id: page as i64,
                    frame_id: -1,
                    total_page_faults: self.total_page_faults,
                    total_replacements: self.total_replacements,
                },
            );
        }

        self.waiting.insert(pid);
        false
    }

    /// Serves the fault queue for `delta` sub-ticks starting at
    /// `start`; returns the PIDs whose pending sets drained
    pub fn advance(
        &mut self,
        delta: u64,
        start: Tick,
        table: &mut ProcessTable,
    ) -> Result<Vec<Pid>, MemoryError> {
        let mut released = Vec::new();
        for step in 0..delta {
            let now = start + step;
            if self.active.is_none() {
                self.start_next_task(now, table)?;
            }
            if let Some(task) = self.active.as_mut() {
                task.remaining -= 1;
                if task.remaining == 0 {
                    let task = self.active.take().expect("active task checked above");
                    if let Some(pid) = self.complete_task(task, now, table)? {
                        released.push(pid);
                    }
                }
            }
            if self.active.is_none() {
                self.start_next_task(now, table)?;
            }
        }
        Ok(released)
    }

    /// Unpins every resident page of `pid`; called when it leaves the CPU
    pub fn mark_inactive(&mut self, pid: Pid, table: &mut ProcessTable) {
        if let Some(process) = table.get_mut(pid) {
            for entry in process.page_table.iter_mut() {
                if entry.resident {
                    entry.referenced = false;
                }
            }
        }
    }

    /// Frees every frame owned by `pid` and drops its queued loads
    pub fn unregister(&mut self, pid: Pid, table: &mut ProcessTable) {
        self.pending.remove(&pid);
        self.waiting.remove(&pid);
        self.fault_queue.retain(|task| task.pid != pid);
        if self.active.as_ref().map(|t| t.pid) == Some(pid) {
            if let Some(task) = self.active.take() {
                if let Some(frame) = task.frame {
                    self.policy.on_frame_released(frame);
                    self.frames[frame].clear();
                }
            }
        }

        for frame in self.frames.iter_mut() {
            if frame.owner.map(|(owner, _)| owner) == Some(pid) {
                self.policy.on_frame_released(frame.id);
                frame.clear();
            }
        }

        if let Some(process) = table.get_mut(pid) {
            for entry in process.page_table.iter_mut() {
                entry.resident = false;
                entry.frame = None;
                entry.referenced = false;
            }
        }
    }

    /// Releases a terminated process's memory
    pub fn release(&mut self, pid: Pid, table: &mut ProcessTable) {
        self.unregister(pid, table);
    }

    /// Returns the manager to an empty, reloadable state
    pub fn reset(&mut self) {
        let total = self.frames.len();
        self.frames = (0..total).map(Frame::new).collect();
        self.policy = make_replacement_policy(self.algorithm);
        self.fault_queue.clear();
        self.active = None;
        self.pending.clear();
        self.waiting.clear();
        self.total_page_faults = 0;
        self.total_replacements = 0;
    }

    /// Pops the queue head and reserves a frame for it, or rotates it
    /// to the tail when no frame can be taken this sub-tick
    fn start_next_task(&mut self, now: Tick, table: &mut ProcessTable) -> Result<(), MemoryError> {
        let Some(mut task) = self.fault_queue.pop_front() else {
            return Ok(());
        };
        if self.reserve_frame(&mut task, now, table)? {
            task.remaining = self.latency;
            self.active = Some(task);
        } else {
            self.fault_queue.push_back(task);
        }
        Ok(())
    }

    /// Finds a free frame or evicts a victim; false means wait
    fn reserve_frame(
        &mut self,
        task: &mut PageLoadTask,
        now: Tick,
        table: &mut ProcessTable,
    ) -> Result<bool, MemoryError> {
        let frame_id = match self.frames.iter().position(|f| !f.occupied()) {
            Some(free) => free,
            None => {
                let Some(victim) = self.policy.select_victim(&self.frames, table, now) else {
                    return Ok(false);
                };
                if victim >= self.frames.len() {
                    return Err(MemoryError::VictimOutOfRange {
                        frame: victim,
                        tick: now,
                    });
                }
                if frame_is_pinned(&self.frames[victim], table) {
                    return Ok(false);
                }
                self.evict(victim, now, table);
                victim
            }
        };

        self.frames[frame_id].owner = Some((task.pid, task.page));
        task.frame = Some(frame_id);
        Ok(true)
    }

    /// Pushes a victim page out of its frame
    fn evict(&mut self, frame_id: FrameId, now: Tick, table: &mut ProcessTable) {
        let Some((victim_pid, victim_page)) = self.frames[frame_id].owner else {
            return;
        };

        if let Some(victim) = table.get_mut(victim_pid) {
            if let Some(entry) = victim.page_table.get_mut(victim_page) {
                entry.resident = false;
                entry.frame = None;
            }
            victim.replacements += 1;
            self.total_replacements += 1;
            let name = victim.name.clone();
            self.metrics.log_memory(
                now,
                MemoryRecord {
                    event: MemoryEvent::PageReplaced,
                    pid: i64::from(victim_pid.0),
                    name,
                    page_id: victim_page as i64,
                    frame_id: frame_id as i64,
                    total_page_faults: self.total_page_faults,
                    total_replacements: self.total_replacements,
                },
            );
        }

        self.policy.on_frame_released(frame_id);
        self.frames[frame_id].clear();
    }

    /// Finishes the active task: the page becomes resident and, when
    /// this drains the owner's pending set, the owner is released
    fn complete_task(
        &mut self,
        task: PageLoadTask,
        now: Tick,
        table: &mut ProcessTable,
    ) -> Result<Option<Pid>, MemoryError> {
        let Some(frame_id) = task.frame else {
            debug_assert!(false, "active task without a reserved frame");
            return Ok(None);
        };
        let name = {
            let process = table.get_mut(task.pid).ok_or(MemoryError::UnknownProcess {
                pid: task.pid,
                tick: now,
            })?;
            if let Some(entry) = process.page_table.get_mut(task.page) {
                entry.resident = true;
                entry.frame = Some(frame_id);
                entry.referenced = true;
                entry.last_access = now;
            }
            process.name.clone()
        };

        self.frames[frame_id].owner = Some((task.pid, task.page));
        self.policy.on_frame_loaded(frame_id);
        self.metrics.log_memory(
            now,
            MemoryRecord {
                event: MemoryEvent::PageLoaded,
                pid: i64::from(task.pid.0),
                name,
                page_id: task.page as i64,
                frame_id: frame_id as i64,
                total_page_faults: self.total_page_faults,
                total_replacements: self.total_replacements,
            },
        );

        if let Some(pending) = self.pending.get_mut(&task.pid) {
            pending.remove(&task.page);
            if pending.is_empty() {
                self.pending.remove(&task.pid);
            }
        }

        if !self.pending.contains_key(&task.pid) && self.waiting.remove(&task.pid) {
            if let Some(process) = table.get_mut(task.pid) {
                for entry in process.page_table.iter_mut() {
                    if entry.resident {
                        entry.referenced = true;
                    }
                }
            }
            return Ok(Some(task.pid));
        }
        Ok(None)
    }

    /// Global page-fault count
    pub fn total_page_faults(&self) -> u64 {
        self.total_page_faults
    }

    /// Global replacement count
    pub fn total_replacements(&self) -> u64 {
        self.total_replacements
    }

    /// Frames currently holding a page
    pub fn used_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.occupied()).count()
    }

    /// Number of physical frames
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// The frame table, read-only
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// PIDs blocked on memory, ascending
    pub fn waiting_pids(&self) -> Vec<Pid> {
        self.waiting.iter().copied().collect()
    }

    /// True while loads are queued or in flight
    pub fn has_pending_loads(&self) -> bool {
        self.active.is_some() || !self.fault_queue.is_empty()
    }

    /// Frame reserved by the in-flight load, if one is active
    ///
    /// The frame is occupied from reservation, but its page only turns
    /// resident at completion; accounting that compares the two must
    /// allow for this window.
    pub fn active_reservation(&self) -> Option<FrameId> {
        self.active.as_ref().and_then(|task| task.frame)
    }

    /// The configured replacement algorithm
    pub fn algorithm(&self) -> ReplacementAlgorithm {
        self.algorithm
    }

    /// Frame-table snapshot in trace form
    pub fn frame_status_records(&self) -> Vec<FrameStatusRecord> {
        self.frames
            .iter()
            .map(|frame| FrameStatusRecord {
                frame: frame.id,
                occupied: frame.occupied(),
                pid: frame.owner.map(|(p, _)| i64::from(p.0)).unwrap_or(-1),
                page: frame.owner.map(|(_, pg)| pg as i64).unwrap_or(-1),
            })
            .collect()
    }

    /// Page-table snapshot of one process in trace form
    pub fn page_table_record(&self, pid: Pid, table: &ProcessTable) -> Option<PageTableRecord> {
        let process = table.get(pid)?;
        Some(PageTableRecord {
            pid: i64::from(pid.0),
            name: process.name.clone(),
            pages: process
                .page_table
                .iter()
                .map(|entry| PageEntryRecord {
                    page: entry.page_id,
                    frame: entry.frame.map(|f| f as i64).unwrap_or(-1),
                    valid: entry.resident,
                    referenced: entry.referenced,
                    modified: entry.dirty,
                })
                .collect(),
        })
    }
}
