//! libudev backend
//!
//! Links against the system libudev through the `udev` crate.

use crate::backend::{DeviceBackend, DeviceMonitor};
use crate::config::DevConfig;
use crate::error::{DevError, MonitorStep, Result};
use crate::types::{DeviceAction, DeviceEvent};
use crate::udev::UdevPlugin;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use ::udev::{Device, MonitorBuilder, MonitorSocket, Udev};

/// udev plugin over the system libudev
pub type LibudevPlugin<R> = UdevPlugin<UdevBackend, R>;

impl<R: crate::eloop::Registry> LibudevPlugin<R> {
    /// Create a udev plugin using the system libudev
    pub fn system(registry: R, config: &DevConfig) -> Self {
        UdevPlugin::new(UdevBackend, registry, config)
    }
}

/// Backend over the system libudev
#[derive(Debug, Clone, Copy, Default)]
pub struct UdevBackend;

/// Monitor socket listening on the "udev" netlink source
pub struct UdevMonitor {
    socket: MonitorSocket,
}

impl DeviceMonitor for UdevMonitor {
    fn descriptor(&self) -> Option<RawFd> {
        let fd = self.socket.as_raw_fd();
        (fd >= 0).then_some(fd)
    }

    fn receive(&mut self) -> Option<DeviceEvent> {
        let event = self.socket.iter().next()?;

        let subsystem = event.subsystem().map(|s| s.to_string_lossy().into_owned());
        let action = event
            .action()
            .map(|a| DeviceAction::from_tag(&a.to_string_lossy()))
            .unwrap_or_else(|| DeviceAction::Other(String::new()));

        Some(DeviceEvent {
            subsystem,
            sysname: event.sysname().to_string_lossy().into_owned(),
            action,
        })
    }
}

impl DeviceBackend for UdevBackend {
    type Context = Udev;
    type Monitor = UdevMonitor;

    fn open(&self) -> io::Result<Udev> {
        Udev::new()
    }

    // The udev crate keeps building a monitor from an existing context
    // private, so the monitor gets its own. `ctx` remains the handle for
    // device lookups.
    fn monitor(&self, _ctx: &Udev, subsystem: Option<&str>) -> Result<UdevMonitor> {
        let mut builder = MonitorBuilder::new()
            .map_err(|e| DevError::monitor(MonitorStep::Create, e))?;

        if let Some(subsystem) = subsystem {
            builder = builder
                .match_subsystem(subsystem)
                .map_err(|e| DevError::monitor(MonitorStep::Filter, e))?;
        }

        let socket = builder
            .listen()
            .map_err(|e| DevError::monitor(MonitorStep::Enable, e))?;

        Ok(UdevMonitor { socket })
    }

    fn is_initialized(&self, ctx: &Udev, subsystem: &str, sysname: &str) -> Option<bool> {
        Device::from_subsystem_sysname_with_context(
            ctx.clone(),
            subsystem.to_string(),
            sysname.to_string(),
        )
        .ok()
        .map(|device| device.is_initialized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_on_net_subsystem() {
        let backend = UdevBackend;
        let ctx = match backend.open() {
            Ok(ctx) => ctx,
            Err(e) => {
                // Expected inside containers without udev
                println!("libudev unavailable (expected in CI): {}", e);
                return;
            }
        };

        match backend.monitor(&ctx, Some("net")) {
            Ok(mut monitor) => {
                assert!(monitor.descriptor().is_some_and(|fd| fd >= 0));
                // Non-blocking socket, nothing queued yet is fine
                let _ = monitor.receive();
            }
            Err(e) => println!("udev monitor unavailable (expected in CI): {}", e),
        }

        assert_eq!(backend.is_initialized(&ctx, "net", "nonexistent-if"), None);
    }
}
