//! The device bank
//!
//! Holds devices by name in an ordered map: iteration order is
//! ascending device name, which is the guaranteed processing order for
//! completions that land on the same tick.

use crate::device::{IoCompletion, IoDevice};
use crate::request::IoRequest;
use core_types::{Pid, Tick};
use std::collections::BTreeMap;
use thiserror::Error;

/// Routing failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IoBankError {
    #[error("unknown device '{device}' for process {pid}")]
    UnknownDevice { device: String, pid: Pid },
}

/// Name-keyed collection of devices
#[derive(Default)]
pub struct IoBank {
    devices: BTreeMap<String, IoDevice>,
}

impl IoBank {
    /// Creates an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a device under its own name
    pub fn add_device(&mut self, device: IoDevice) {
        self.devices.insert(device.name().to_string(), device);
    }

    /// True if `name` is a known device
    pub fn has_device(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// Read access to one device
    pub fn device(&self, name: &str) -> Option<&IoDevice> {
        self.devices.get(name)
    }

    /// Routes a request to its device's queue
    pub fn submit(&mut self, request: IoRequest) -> Result<(), IoBankError> {
        match self.devices.get_mut(&request.device) {
            Some(device) => {
                device.enqueue(request);
                Ok(())
            }
            None => Err(IoBankError::UnknownDevice {
                device: request.device.clone(),
                pid: request.pid,
            }),
        }
    }

    /// Ticks every device one sub-tick, ascending by name
    pub fn tick_all(&mut self, now: Tick) -> Vec<IoCompletion> {
        self.devices
            .values_mut()
            .filter_map(|device| device.tick(now))
            .collect()
    }

    /// True while any device has queued or active work
    pub fn has_pending_io(&self) -> bool {
        self.devices.values().any(IoDevice::has_pending)
    }

    /// Devices in name order
    pub fn devices(&self) -> impl Iterator<Item = &IoDevice> {
        self.devices.values()
    }

    /// Resets every device
    pub fn reset_all(&mut self) {
        for device in self.devices.values_mut() {
            device.reset();
        }
    }
}
