//! # Simulation Engine
//!
//! The kernel coordination engine: owns the clock, the process arena,
//! and the ready queue, and drives the memory manager and the device
//! bank one sub-tick at a time.
//!
//! ## Philosophy
//!
//! - **Determinism first**: same workload + same configuration =>
//!   same trace. No threads, no wall clock, no hidden yields.
//! - **One mutation owner per structure**: only the engine touches the
//!   ready queue and process states; only the memory manager touches
//!   frames; only a device touches its own queue.
//! - **Blocking is a state transition**: the engine never waits on
//!   anything; a blocked process simply leaves the ready queue until a
//!   subsystem hands its PID back.

pub mod engine;
pub mod error;

pub use engine::SimEngine;
pub use error::SimError;
