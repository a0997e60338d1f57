//! udev device plugin
//!
//! Watches the host device-notification service for network interfaces being
//! added, renamed or removed and forwards those to the daemon. Also answers
//! whether an interface has been fully initialized by udev, so the daemon
//! does not touch it while udev rules are still renaming or configuring it.

use crate::backend::{DeviceBackend, DeviceMonitor};
use crate::config::DevConfig;
use crate::eloop::{InterfaceHandler, Registry, Token};
use crate::error::{DevError, Result};
use crate::metrics::EventMetrics;
use crate::plugin::DevicePlugin;
use crate::types::{Dispatch, NET_SUBSYSTEM};
use log::{debug, error, trace};
use std::os::unix::io::RawFd;

/// Plugin name reported to the daemon
pub const UDEV_NAME: &str = "udev";

/// udev device plugin
///
/// Holds at most one service handle and one monitor. Teardown always runs
/// in the order descriptor, monitor, handle.
pub struct UdevPlugin<B: DeviceBackend, R: Registry> {
    /// Device service access
    backend: B,

    /// Event loop handle
    registry: R,

    /// Install the subsystem filter on the monitor
    subsystem_filter: bool,

    /// Open service handle
    context: Option<B::Context>,

    /// Monitor bound to `context`
    monitor: Option<B::Monitor>,

    /// Descriptor registered with the event loop
    monitor_fd: Option<RawFd>,

    /// Event counters
    metrics: EventMetrics,
}

impl<B: DeviceBackend, R: Registry> UdevPlugin<B, R> {
    pub fn new(backend: B, registry: R, config: &DevConfig) -> Self {
        Self {
            backend,
            registry,
            subsystem_filter: config.subsystem_filter,
            context: None,
            monitor: None,
            monitor_fd: None,
            metrics: EventMetrics::new(),
        }
    }

    /// Descriptor currently registered with the event loop
    pub fn monitor_fd(&self) -> Option<RawFd> {
        self.monitor_fd
    }

    fn open(&mut self) -> Result<RawFd> {
        let context = self
            .context
            .insert(self.backend.open().map_err(DevError::ServiceOpen)?);

        let filter = self.subsystem_filter.then_some(NET_SUBSYSTEM);
        let monitor = self.monitor.insert(self.backend.monitor(context, filter)?);

        let fd = monitor
            .descriptor()
            .filter(|fd| *fd >= 0)
            .ok_or(DevError::DescriptorUnavailable)?;

        self.registry
            .add_reader(fd, Token::DEVICE)
            .map_err(DevError::Register)?;
        self.monitor_fd = Some(fd);

        Ok(fd)
    }
}

impl<B: DeviceBackend, R: Registry> DevicePlugin for UdevPlugin<B, R> {
    fn name(&self) -> &str {
        UDEV_NAME
    }

    fn start(&mut self) -> Result<RawFd> {
        if self.context.is_some() {
            error!("{}: already started", UDEV_NAME);
            return Err(DevError::AlreadyStarted(UDEV_NAME.to_string()));
        }

        debug!("{}: starting", UDEV_NAME);
        self.open().map_err(|e| {
            error!("{}: {}", UDEV_NAME, e);
            self.stop();
            e
        })
    }

    fn stop(&mut self) {
        if let Some(fd) = self.monitor_fd.take() {
            self.registry.remove_reader(fd);
        }
        self.monitor = None;
        if self.context.take().is_some() {
            debug!("{}: stopped", UDEV_NAME);
        }
    }

    fn listening(&self) -> bool {
        self.monitor.is_some()
    }

    fn settled(&self, ifname: &str) -> bool {
        self.context
            .as_ref()
            .and_then(|ctx| self.backend.is_initialized(ctx, NET_SUBSYSTEM, ifname))
            .unwrap_or(false)
    }

    fn handle_data(&mut self, handler: &mut dyn InterfaceHandler) -> Dispatch {
        let Some(event) = self.monitor.as_mut().and_then(|m| m.receive()) else {
            debug!("libudev: received NULL device");
            self.metrics.record_empty();
            return Dispatch::Empty;
        };
        self.metrics.record_event();

        // The service filter is only "usually" exact
        if !event.is_net() {
            trace!(
                "{}: libudev: ignoring {:?} device",
                event.sysname,
                event.subsystem
            );
            self.metrics.record_foreign();
            return Dispatch::Handled;
        }

        debug!("{}: libudev: {}", event.sysname, event.action);
        match event.action.interface_change() {
            Some(change) => {
                handler.handle_interface(change, &event.sysname);
                self.metrics.record_change(change);
            }
            None => self.metrics.record_ignored(),
        }

        Dispatch::Handled
    }

    fn metrics(&self) -> Option<&EventMetrics> {
        Some(&self.metrics)
    }
}

impl<B: DeviceBackend, R: Registry> Drop for UdevPlugin<B, R> {
    fn drop(&mut self) {
        self.stop();
    }
}
