//! The engine proper
//!
//! One call to [`SimEngine::step`] makes one scheduling decision:
//! admit arrivals, pick a candidate, gate it through the memory
//! manager, then either execute CPU sub-ticks, submit an I/O request,
//! or advance one idle tick. Memory and devices co-advance by exactly
//! the sub-ticks the CPU consumed, so callbacks land inside the step
//! that caused them.

use core_types::{
    BurstKind, Pid, Process, ProcessState, ProcessTable, SchedulingAlgorithm, SimConfig, Tick,
    burst::DEFAULT_IO_DEVICE,
};
use io_bank::{IoBank, IoCompletion, IoDevice, IoRequest};
use memory_manager::MemoryManager;
use metrics::{CpuEvent, CpuRecord, MetricsCollector, QueueSnapshot, TransitionRecord};
use ready_queue::{make_ready_queue, ReadyQueue};
use std::sync::Arc;

use crate::error::SimError;

/// The kernel coordination engine
pub struct SimEngine {
    config: SimConfig,
    processes: ProcessTable,
    ready: Box<dyn ReadyQueue>,
    memory: MemoryManager,
    io: IoBank,
    metrics: Arc<MetricsCollector>,
    clock: Tick,
    context_switches: u64,
    total_cpu_ticks: u64,
    last_dispatched: Option<Pid>,
    preempt_requested: bool,
}

impl SimEngine {
    /// Creates an engine for `config`, with the default device installed
    pub fn new(config: SimConfig, metrics: Arc<MetricsCollector>) -> Self {
        let memory = MemoryManager::new(
            config.total_memory_frames,
            config.page_replacement_algorithm,
            config.page_fault_latency,
            Arc::clone(&metrics),
        );
        let mut io = IoBank::new();
        io.add_device(IoDevice::new(
            DEFAULT_IO_DEVICE,
            config.io_scheduling_algorithm,
            config.io_quantum,
            Arc::clone(&metrics),
        ));
        Self {
            ready: make_ready_queue(config.scheduling_algorithm),
            memory,
            io,
            metrics,
            processes: ProcessTable::new(),
            clock: 0,
            context_switches: 0,
            total_cpu_ticks: 0,
            last_dispatched: None,
            preempt_requested: false,
            config,
        }
    }

    /// Installs a workload, resetting the clock and every counter
    ///
    /// A device is created for every device name the workload's I/O
    /// bursts mention, under the configured per-device policy.
    pub fn load(&mut self, processes: Vec<Process>) {
        self.reset_state();
        self.processes.clear();
        for process in processes {
            for burst in &process.bursts {
                if burst.kind == BurstKind::Io {
                    self.ensure_device(burst.device_name());
                }
            }
            self.processes.insert(process);
        }
    }

    /// Returns the engine to a reloadable state, keeping the workload
    pub fn reset(&mut self) {
        self.reset_state();
        for process in self.processes.iter_mut() {
            process.reset();
        }
    }

    fn reset_state(&mut self) {
        self.clock = 0;
        self.context_switches = 0;
        self.total_cpu_ticks = 0;
        self.last_dispatched = None;
        self.preempt_requested = false;
        self.ready.clear();
        self.memory.reset();
        self.io.reset_all();
    }

    fn ensure_device(&mut self, name: &str) {
        if !self.io.has_device(name) {
            self.io.add_device(IoDevice::new(
                name,
                self.config.io_scheduling_algorithm,
                self.config.io_quantum,
                Arc::clone(&self.metrics),
            ));
        }
    }

    /// Runs `step` until every process is TERMINATED
    pub fn run(&mut self) -> Result<(), SimError> {
        let quantum = self.effective_quantum();
        while self.step(quantum)? {}
        Ok(())
    }

    /// Bounded variant of [`run`](Self::run); true means finished
    ///
    /// A workload whose working set can never be satisfied is
    /// legitimate backpressure, so `run` on such input spins; tests
    /// and cautious drivers use this instead.
    pub fn run_for(&mut self, max_steps: u64) -> Result<bool, SimError> {
        let quantum = self.effective_quantum();
        for _ in 0..max_steps {
            if !self.step(quantum)? {
                return Ok(true);
            }
        }
        Ok(self.processes.all_terminated())
    }

    fn effective_quantum(&self) -> u64 {
        match self.config.scheduling_algorithm {
            SchedulingAlgorithm::RoundRobin => self.config.quantum.max(1),
            // Non-preemptive convention: consume the whole burst.
            _ => 0,
        }
    }

    /// Advances the simulation by one scheduling decision
    ///
    /// Returns true while any process is not yet TERMINATED.
    pub fn step(&mut self, quantum: u64) -> Result<bool, SimError> {
        if self.processes.is_empty() || self.processes.all_terminated() {
            return Ok(false);
        }
        let step_start = self.clock;
        self.admit_arrivals_at(self.clock);

        let candidate = loop {
            let Some(pid) = self.ready.peek() else {
                // CPU idles this tick while blocked work drains.
                self.advance_subsystems(1, self.clock)?;
                self.metrics.log_cpu(
                    step_start,
                    CpuRecord {
                        event: CpuEvent::Idle,
                        pid: -1,
                        name: String::new(),
                        remaining: 0,
                        ready_queue: self.ready.len(),
                        context_switch: false,
                    },
                );
                self.clock += 1;
                self.emit_snapshot(step_start);
                return Ok(!self.processes.all_terminated());
            };
            let state = self
                .processes
                .get(pid)
                .ok_or(SimError::UnknownPid {
                    pid,
                    tick: self.clock,
                })?
                .state;
            match state {
                ProcessState::Terminated => {
                    return Err(SimError::TerminatedInReadyQueue {
                        pid,
                        tick: self.clock,
                    })
                }
                ProcessState::Ready => break pid,
                // A callback moved it elsewhere; drop the stale entry.
                _ => {
                    self.ready.remove(pid);
                }
            }
        };

        let switched = self.last_dispatched != Some(candidate);
        if switched {
            self.context_switches += 1;
        }
        self.last_dispatched = Some(candidate);

        if !self
            .memory
            .prepare_for_cpu(candidate, self.clock, &mut self.processes)
        {
            self.ready.remove(candidate);
            self.transition(candidate, ProcessState::MemoryWaiting, "page fault", step_start);
            self.emit_snapshot(step_start);
            return Ok(true);
        }

        let kind = self
            .processes
            .get(candidate)
            .and_then(Process::current_burst)
            .map(|burst| burst.kind)
            .ok_or(SimError::NoBurst {
                pid: candidate,
                tick: self.clock,
            })?;

        match kind {
            BurstKind::Io => self.dispatch_io(candidate, step_start)?,
            BurstKind::Cpu => self.dispatch_cpu(candidate, quantum, switched, step_start)?,
        }

        self.emit_snapshot(step_start);
        Ok(!self.processes.all_terminated())
    }

    /// Admits every NEW process whose arrival tick has passed, in
    /// ascending PID order
    fn admit_arrivals_at(&mut self, now: Tick) {
        let arrivals: Vec<Pid> = self
            .processes
            .iter()
            .filter(|p| p.state == ProcessState::New && p.has_arrived(now))
            .map(|p| p.pid)
            .collect();
        for pid in arrivals {
            self.memory.register(pid, &mut self.processes);
            self.transition(pid, ProcessState::Ready, "arrived", now);
            self.enqueue_ready(pid);
        }
    }

    /// Blocks the candidate on its I/O burst and submits the request
    fn dispatch_io(&mut self, pid: Pid, step_start: Tick) -> Result<(), SimError> {
        self.ready.remove(pid);
        let request = {
            let process = self.processes.get(pid).ok_or(SimError::UnknownPid {
                pid,
                tick: self.clock,
            })?;
            let burst = process.current_burst().ok_or(SimError::NoBurst {
                pid,
                tick: self.clock,
            })?;
            IoRequest::new(
                pid,
                process.name.clone(),
                burst.device_name().to_string(),
                burst.remaining,
                self.clock,
            )
        };
        self.transition(pid, ProcessState::IoWaiting, "io request submitted", step_start);
        // The gate pinned the pages for a CPU run that is not
        // happening; release them for the duration of the I/O.
        self.memory.mark_inactive(pid, &mut self.processes);
        self.io.submit(request)?;
        Ok(())
    }

    /// Executes up to `quantum` sub-ticks of the candidate's CPU burst
    fn dispatch_cpu(
        &mut self,
        pid: Pid,
        quantum: u64,
        switched: bool,
        step_start: Tick,
    ) -> Result<(), SimError> {
        self.ready.remove(pid);
        self.transition(pid, ProcessState::Running, "dispatched", step_start);

        let (name, remaining) = {
            let process = self.processes.get_mut(pid).ok_or(SimError::UnknownPid {
                pid,
                tick: self.clock,
            })?;
            if process.first_start.is_none() {
                process.first_start = Some(self.clock);
            }
            let remaining = process
                .current_burst()
                .map(|b| b.remaining)
                .unwrap_or(0);
            (process.name.clone(), remaining)
        };

        let slice = if quantum == 0 {
            remaining
        } else {
            quantum.min(remaining)
        };
        self.preempt_requested = false;
        let mut executed: u64 = 0;
        let mut preempted = false;

        while executed < slice {
            let now = self.clock + executed;
            let left = {
                let burst = self
                    .processes
                    .get_mut(pid)
                    .and_then(Process::current_burst_mut)
                    .ok_or(SimError::NoBurst { pid, tick: now })?;
                burst.remaining -= 1;
                burst.remaining
            };
            executed += 1;
            self.metrics.log_cpu(
                now,
                CpuRecord {
                    event: CpuEvent::Exec,
                    pid: i64::from(pid.0),
                    name: name.clone(),
                    remaining: left as i64,
                    ready_queue: self.ready.len(),
                    context_switch: switched && executed == 1,
                },
            );
            self.advance_subsystems(1, now)?;
            // Simulated time is now + 1; late arrivals join here so a
            // stronger one can preempt at this boundary.
            self.admit_arrivals_at(now + 1);
            if executed < slice && self.should_preempt(pid) {
                preempted = true;
                break;
            }
        }

        self.clock += executed;
        self.total_cpu_ticks += executed;
        let boundary = self.clock.saturating_sub(1);

        let burst_done = self
            .processes
            .get(pid)
            .and_then(Process::current_burst)
            .map(|b| b.is_complete())
            .unwrap_or(false);

        if burst_done {
            let finished = {
                let process = self.processes.get_mut(pid).ok_or(SimError::UnknownPid {
                    pid,
                    tick: boundary,
                })?;
                process.advance_burst();
                process.all_bursts_complete()
            };
            if finished {
                self.transition(pid, ProcessState::Terminated, "all bursts complete", boundary);
                let completion = self.clock;
                if let Some(process) = self.processes.get_mut(pid) {
                    process.finalize_metrics(completion);
                }
                self.memory.release(pid, &mut self.processes);
                self.metrics.log_cpu(
                    boundary,
                    CpuRecord {
                        event: CpuEvent::Complete,
                        pid: i64::from(pid.0),
                        name,
                        remaining: 0,
                        ready_queue: self.ready.len(),
                        context_switch: switched && executed == 1,
                    },
                );
            } else {
                // End-of-burst yield; the next step submits the I/O
                // burst or re-dispatches the next CPU burst.
                self.transition(pid, ProcessState::Ready, "burst complete", boundary);
                self.memory.mark_inactive(pid, &mut self.processes);
                self.enqueue_ready(pid);
            }
        } else {
            let reason = if preempted { "preempted" } else { "quantum expired" };
            self.transition(pid, ProcessState::Ready, reason, boundary);
            self.memory.mark_inactive(pid, &mut self.processes);
            self.enqueue_ready(pid);
            let left = self
                .processes
                .get(pid)
                .and_then(Process::current_burst)
                .map(|b| b.remaining)
                .unwrap_or(0);
            self.metrics.log_cpu(
                boundary,
                CpuRecord {
                    event: CpuEvent::Preempt,
                    pid: i64::from(pid.0),
                    name,
                    remaining: left as i64,
                    ready_queue: self.ready.len(),
                    context_switch: switched && executed == 1,
                },
            );
        }
        Ok(())
    }

    /// Advances memory and every device by `delta` sub-ticks, draining
    /// both outboxes after each one
    fn advance_subsystems(&mut self, delta: u64, start: Tick) -> Result<(), SimError> {
        for offset in 0..delta {
            let now = start + offset;
            let released = self.memory.advance(1, now, &mut self.processes)?;
            for pid in released {
                self.on_memory_ready(pid, now);
            }
            let completions = self.io.tick_all(now);
            for completion in completions {
                self.on_io_complete(completion, now)?;
            }
        }
        Ok(())
    }

    /// All pages resident: the waiter re-enters the ready queue
    fn on_memory_ready(&mut self, pid: Pid, now: Tick) {
        self.transition(pid, ProcessState::Ready, "pages resident", now);
        self.enqueue_ready(pid);
    }

    /// A device finished a request: reconcile the burst and restore or
    /// terminate the owner
    fn on_io_complete(&mut self, completion: IoCompletion, now: Tick) -> Result<(), SimError> {
        let pid = completion.pid;
        let more_bursts = {
            let process = self.processes.get_mut(pid).ok_or(SimError::UnknownPid {
                pid,
                tick: now,
            })?;
            if let Some(burst) = process.current_burst_mut() {
                burst.remaining = 0;
            }
            process.advance_burst();
            !process.all_bursts_complete()
        };

        if more_bursts {
            self.transition(pid, ProcessState::Ready, "io complete", now);
            self.enqueue_ready(pid);
            match self.config.scheduling_algorithm {
                SchedulingAlgorithm::RoundRobin => {
                    self.preempt_requested = true;
                }
                SchedulingAlgorithm::Priority => {
                    let restored = self.processes.get(pid).map(|p| p.priority);
                    let incumbent = self
                        .processes
                        .iter()
                        .find(|p| p.state == ProcessState::Running)
                        .map(|p| p.priority);
                    if let (Some(restored), Some(incumbent)) = (restored, incumbent) {
                        if restored < incumbent {
                            self.preempt_requested = true;
                        }
                    }
                }
                _ => {}
            }
        } else {
            self.transition(pid, ProcessState::Terminated, "all bursts complete", now);
            if let Some(process) = self.processes.get_mut(pid) {
                process.finalize_metrics(completion.at);
            }
            self.memory.release(pid, &mut self.processes);
        }
        Ok(())
    }

    /// True when the incumbent must yield at this sub-tick boundary
    fn should_preempt(&self, running: Pid) -> bool {
        if self.preempt_requested {
            return true;
        }
        if self.config.scheduling_algorithm != SchedulingAlgorithm::Priority {
            return false;
        }
        let Some(best) = self.ready.peek() else {
            return false;
        };
        let best_priority = self.processes.get(best).map(|p| p.priority);
        let running_priority = self.processes.get(running).map(|p| p.priority);
        match (best_priority, running_priority) {
            (Some(best), Some(running)) => best < running,
            _ => false,
        }
    }

    fn enqueue_ready(&mut self, pid: Pid) {
        if let Some(process) = self.processes.get(pid) {
            self.ready.push(process);
        }
    }

    fn transition(&mut self, pid: Pid, to: ProcessState, reason: &str, tick: Tick) {
        let Some((from, name)) = self.processes.get_mut(pid).map(|process| {
            let from = process.state;
            process.state = to;
            (from, process.name.clone())
        }) else {
            return;
        };
        self.metrics.log_transition(
            tick,
            TransitionRecord {
                pid: i64::from(pid.0),
                name,
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: reason.to_string(),
            },
        );
    }

    /// Emits the end-of-step queue snapshot (and, when the workload
    /// pages at all, the paging snapshots) for `tick`
    fn emit_snapshot(&self, tick: Tick) {
        let running = self
            .processes
            .iter()
            .find(|p| p.state == ProcessState::Running)
            .map(|p| p.pid);
        self.metrics.log_queues(
            tick,
            QueueSnapshot {
                ready: self.ready.pids().iter().map(|p| p.0).collect(),
                blocked_memory: self.memory.waiting_pids().iter().map(|p| p.0).collect(),
                blocked_io: self
                    .processes
                    .pids_in_state(ProcessState::IoWaiting)
                    .iter()
                    .map(|p| p.0)
                    .collect(),
                running: Pid::option_as_i64(running),
            },
        );

        if self.processes.iter().any(|p| p.pages_required > 0) {
            self.metrics
                .log_frame_status(tick, self.memory.frame_status_records());
            if let Some(pid) = self.last_dispatched {
                if self
                    .processes
                    .get(pid)
                    .map(|p| p.pages_required > 0)
                    .unwrap_or(false)
                {
                    if let Some(record) = self.memory.page_table_record(pid, &self.processes) {
                        self.metrics.log_page_table(tick, record);
                    }
                }
            }
        }
    }

    /// Checks the end-of-tick invariants; tests call this after steps
    pub fn validate(&self) -> Result<(), SimError> {
        let tick = self.clock;
        let invariant = |detail: String| SimError::Invariant { tick, detail };

        let running: Vec<Pid> = self.processes.pids_in_state(ProcessState::Running);
        if running.len() > 1 {
            return Err(invariant(format!("{} processes RUNNING", running.len())));
        }

        let ready_pids = self.ready.pids();
        for process in self.processes.iter() {
            let in_ready = ready_pids.iter().filter(|&&p| p == process.pid).count();
            if in_ready > 1 {
                return Err(invariant(format!(
                    "pid {} queued {} times",
                    process.pid, in_ready
                )));
            }
            let expected = match process.state {
                ProcessState::Ready => 1,
                _ => 0,
            };
            if process.state != ProcessState::New && in_ready != expected {
                return Err(invariant(format!(
                    "pid {} in state {} but queued {} times",
                    process.pid, process.state, in_ready
                )));
            }
        }

        let resident: usize = self.processes.iter().map(Process::resident_pages).sum();
        let in_flight = usize::from(self.memory.active_reservation().is_some());
        let occupied = self.memory.used_frames();
        if resident + in_flight != occupied {
            return Err(invariant(format!(
                "{occupied} occupied frames vs {resident} resident pages"
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for frame in self.memory.frames() {
            if let Some(owner) = frame.owner {
                if !seen.insert(owner) {
                    return Err(invariant(format!(
                        "page ({}, {}) occupies two frames",
                        owner.0, owner.1
                    )));
                }
            }
        }
        Ok(())
    }

    /// Current simulation time
    pub fn current_time(&self) -> Tick {
        self.clock
    }

    /// Dispatches whose PID differed from the previous one
    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    /// Percentage of ticks the CPU spent executing bursts
    pub fn cpu_utilization(&self) -> f64 {
        if self.clock == 0 {
            return 0.0;
        }
        100.0 * self.total_cpu_ticks as f64 / self.clock as f64
    }

    fn average_of(&self, field: impl Fn(&Process) -> Option<u64>) -> f64 {
        let done: Vec<u64> = self
            .processes
            .iter()
            .filter(|p| p.state == ProcessState::Terminated)
            .filter_map(field)
            .collect();
        if done.is_empty() {
            return 0.0;
        }
        done.iter().sum::<u64>() as f64 / done.len() as f64
    }

    /// Mean waiting time over terminated processes
    pub fn average_waiting_time(&self) -> f64 {
        self.average_of(|p| p.waiting)
    }

    /// Mean turnaround time over terminated processes
    pub fn average_turnaround_time(&self) -> f64 {
        self.average_of(|p| p.turnaround)
    }

    /// Mean response time over terminated processes
    pub fn average_response_time(&self) -> f64 {
        self.average_of(|p| p.response)
    }

    /// The process arena, read-only
    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    /// The device bank, read-only
    pub fn io_bank(&self) -> &IoBank {
        &self.io
    }

    /// The memory manager, read-only
    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// The engine configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Writes the CPU and memory summary records after the trace
    pub fn emit_summaries(&self) {
        self.metrics.flush_all();
        self.metrics.log_cpu_summary(
            self.clock,
            self.cpu_utilization(),
            self.average_waiting_time(),
            self.average_turnaround_time(),
            self.average_response_time(),
            self.context_switches,
            self.config.scheduling_algorithm.as_str(),
        );
        self.metrics.log_memory_summary(
            self.memory.total_page_faults(),
            self.memory.total_replacements(),
            self.memory.total_frames(),
            self.memory.used_frames(),
            self.config.page_replacement_algorithm.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Burst;

    fn engine(config: SimConfig) -> SimEngine {
        SimEngine::new(config, Arc::new(MetricsCollector::new()))
    }

    fn cpu_proc(pid: u32, arrival: Tick, burst: u64) -> Process {
        Process::new(
            Pid(pid),
            format!("P{pid}"),
            arrival,
            vec![Burst::cpu(burst)],
            0,
            0,
        )
    }

    #[test]
    fn test_empty_engine_has_no_work() {
        let mut eng = engine(SimConfig::default());
        assert!(!eng.step(0).unwrap());
    }

    #[test]
    fn test_single_process_runs_to_completion() {
        let mut eng = engine(SimConfig::default());
        eng.load(vec![cpu_proc(1, 0, 5)]);
        eng.run().unwrap();
        let p = eng.processes().get(Pid(1)).unwrap();
        assert_eq!(p.state, ProcessState::Terminated);
        assert_eq!(p.completion, Some(5));
        assert_eq!(p.waiting, Some(0));
        assert_eq!(eng.context_switches(), 1);
        assert_eq!(eng.current_time(), 5);
        assert!((eng.cpu_utilization() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_late_arrival_idles_the_cpu() {
        let mut eng = engine(SimConfig::default());
        eng.load(vec![cpu_proc(1, 3, 2)]);
        eng.run().unwrap();
        let p = eng.processes().get(Pid(1)).unwrap();
        assert_eq!(p.completion, Some(5));
        assert_eq!(p.response, Some(0));
        // Three idle ticks, two busy ones.
        assert!((eng.cpu_utilization() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_then_rerun_is_identical() {
        let mut eng = engine(SimConfig::default());
        eng.load(vec![cpu_proc(1, 0, 4), cpu_proc(2, 1, 2)]);
        eng.run().unwrap();
        let first = (
            eng.current_time(),
            eng.context_switches(),
            eng.average_waiting_time(),
        );
        eng.reset();
        assert_eq!(eng.current_time(), 0);
        eng.run().unwrap();
        let second = (
            eng.current_time(),
            eng.context_switches(),
            eng.average_waiting_time(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_validate_passes_through_a_run() {
        let mut eng = engine(SimConfig::default());
        eng.load(vec![cpu_proc(1, 0, 3), cpu_proc(2, 0, 2)]);
        while eng.step(0).unwrap() {
            eng.validate().unwrap();
        }
        eng.validate().unwrap();
    }
}
