//! Device monitoring for the DHCP client daemon
//!
//! Device plugins tell the daemon when network interfaces appear, are renamed
//! or go away, and whether the host has finished initializing an interface:
//! - `udev`: the udev device plugin, generic over the device service backend
//! - `backends`: real backends (libudev behind the `udev` feature)
//! - `manager`: loads one plugin out of those registered
//!
//! Everything here is single-threaded. The daemon's event loop reports the
//! plugin descriptor as readable and then drains the plugin via
//! `handle_data`.

pub mod backend;
pub mod backends;
pub mod config;
pub mod eloop;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod plugin;
pub mod types;
pub mod udev;

pub use backend::{DeviceBackend, DeviceMonitor};
pub use config::DevConfig;
pub use eloop::{InterfaceHandler, Registry, Token};
pub use error::{DevError, MonitorStep, Result};
pub use manager::DeviceManager;
pub use metrics::EventMetrics;
pub use plugin::DevicePlugin;
pub use types::{DeviceAction, DeviceEvent, Dispatch, InterfaceChange, NET_SUBSYSTEM};
pub use crate::udev::{UdevPlugin, UDEV_NAME};

#[cfg(feature = "udev")]
pub use backends::{LibudevPlugin, UdevBackend};
