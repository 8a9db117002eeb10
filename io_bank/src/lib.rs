//! # I/O Bank
//!
//! Simulated I/O devices: each device serves one request at a time
//! under its own queueing policy (FCFS or round-robin with a device
//! quantum), and the bank routes submissions by device name and ticks
//! every device once per sub-tick.
//!
//! ## Philosophy
//!
//! - **Requests carry their own countdown**: a request copies the
//!   burst's remaining time at submission; the engine reconciles the
//!   process record on completion.
//! - **Completions are return values, not up-calls**: `tick_all` hands
//!   back the completions of the sub-tick in ascending device-name
//!   order, which fixes the ordering for simultaneous completions.

pub mod bank;
pub mod device;
pub mod queue;
pub mod request;

pub use bank::{IoBank, IoBankError};
pub use device::{IoCompletion, IoDevice};
pub use queue::{make_device_queue, DeviceQueue, FcfsDeviceQueue, RoundRobinDeviceQueue};
pub use request::{IoRequest, RequestId};
