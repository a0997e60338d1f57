//! Device plugin interface exposed to the host daemon

use crate::eloop::InterfaceHandler;
use crate::error::Result;
use crate::metrics::EventMetrics;
use crate::types::Dispatch;
use std::os::unix::io::RawFd;

/// Device plugin
///
/// A plugin watches the host for network interfaces coming and going and
/// tells the daemon whether an interface has finished initializing.
pub trait DevicePlugin {
    /// Get plugin name
    fn name(&self) -> &str;

    /// Start monitoring, returning the descriptor registered with the event
    /// loop
    fn start(&mut self) -> Result<RawFd>;

    /// Stop monitoring. Safe to call at any time.
    fn stop(&mut self);

    /// Check whether the plugin is monitoring
    fn listening(&self) -> bool;

    /// Check whether an interface has finished host initialization
    fn settled(&self, ifname: &str) -> bool;

    /// Handle one pending event after the descriptor became readable
    fn handle_data(&mut self, handler: &mut dyn InterfaceHandler) -> Dispatch;

    /// Event counters, for plugins that keep them
    fn metrics(&self) -> Option<&EventMetrics> {
        None
    }
}
