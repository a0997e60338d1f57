//! Host device-notification service seam

use crate::error::Result;
use crate::types::DeviceEvent;
use std::io;
use std::os::unix::io::RawFd;

/// A live subscription to device lifecycle events
pub trait DeviceMonitor {
    /// Readable descriptor the monitor delivers events on
    fn descriptor(&self) -> Option<RawFd>;

    /// Take one pending event without blocking
    fn receive(&mut self) -> Option<DeviceEvent>;
}

/// Access to the host device-notification service
pub trait DeviceBackend {
    /// Open service handle
    type Context;

    /// Monitor bound to a service handle
    type Monitor: DeviceMonitor;

    /// Open a connection to the service
    fn open(&self) -> io::Result<Self::Context>;

    /// Create a monitor, optionally filtered to `subsystem`, with reception
    /// enabled
    fn monitor(&self, ctx: &Self::Context, subsystem: Option<&str>) -> Result<Self::Monitor>;

    /// Initialization state of a device, `None` if it cannot be looked up
    fn is_initialized(&self, ctx: &Self::Context, subsystem: &str, sysname: &str) -> Option<bool>;
}
