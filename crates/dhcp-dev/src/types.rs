//! Device event type definitions

use std::fmt;

/// Device class of network interfaces
pub const NET_SUBSYSTEM: &str = "net";

/// Action carried by a device event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    /// Device appeared
    Add,
    /// Device went away
    Remove,
    /// Device was renamed
    Move,
    /// Anything else (change, bind, unbind, ...)
    Other(String),
}

impl DeviceAction {
    /// Parse an action tag as reported by the device service
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "add" => DeviceAction::Add,
            "remove" => DeviceAction::Remove,
            "move" => DeviceAction::Move,
            other => DeviceAction::Other(other.to_string()),
        }
    }

    /// Get action as string
    pub fn as_str(&self) -> &str {
        match self {
            DeviceAction::Add => "add",
            DeviceAction::Remove => "remove",
            DeviceAction::Move => "move",
            DeviceAction::Other(s) => s,
        }
    }

    /// Interface change this action implies, if any
    pub fn interface_change(&self) -> Option<InterfaceChange> {
        match self {
            DeviceAction::Add | DeviceAction::Move => Some(InterfaceChange::Present),
            DeviceAction::Remove => Some(InterfaceChange::Gone),
            DeviceAction::Other(_) => None,
        }
    }
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single notification received from a device monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEvent {
    /// Device class, if the service reported one
    pub subsystem: Option<String>,

    /// Kernel device name (the interface name for `net` devices)
    pub sysname: String,

    /// What happened to the device
    pub action: DeviceAction,
}

impl DeviceEvent {
    pub fn new(subsystem: Option<&str>, sysname: &str, action: DeviceAction) -> Self {
        DeviceEvent {
            subsystem: subsystem.map(str::to_string),
            sysname: sysname.to_string(),
            action,
        }
    }

    /// Shorthand for an event on a network interface
    pub fn net(sysname: &str, action: DeviceAction) -> Self {
        Self::new(Some(NET_SUBSYSTEM), sysname, action)
    }

    /// Check whether the event belongs to the network device class
    pub fn is_net(&self) -> bool {
        self.subsystem.as_deref() == Some(NET_SUBSYSTEM)
    }
}

/// Interface change reported to the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceChange {
    /// Interface is present (added or renamed)
    Present,
    /// Interface is gone
    Gone,
}

impl fmt::Display for InterfaceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceChange::Present => write!(f, "present"),
            InterfaceChange::Gone => write!(f, "gone"),
        }
    }
}

/// Outcome of one event handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A record was consumed
    Handled,
    /// Nothing was pending
    Empty,
}
