//! Device plugin error types

use std::fmt;
use std::io;
use thiserror::Error;

/// Monitor setup step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStep {
    /// Creating the monitor on the netlink source
    Create,
    /// Installing the subsystem filter
    Filter,
    /// Enabling event reception
    Enable,
}

impl fmt::Display for MonitorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStep::Create => write!(f, "create"),
            MonitorStep::Filter => write!(f, "filter"),
            MonitorStep::Enable => write!(f, "enable"),
        }
    }
}

/// Device plugin errors
#[derive(Error, Debug)]
pub enum DevError {
    #[error("{0}: already started")]
    AlreadyStarted(String),

    #[error("Failed to open device service: {0}")]
    ServiceOpen(#[source] io::Error),

    #[error("Monitor {step} failed: {source}")]
    Monitor {
        step: MonitorStep,
        #[source]
        source: io::Error,
    },

    #[error("Monitor descriptor unavailable")]
    DescriptorUnavailable,

    #[error("Event loop registration failed: {0}")]
    Register(#[source] io::Error),

    #[error("Device monitoring disabled")]
    Disabled,

    #[error("Device plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Device plugin already registered: {0}")]
    PluginAlreadyRegistered(String),

    #[error("No device plugins available")]
    NoPlugins,
}

impl DevError {
    /// Monitor failure at the given step
    pub fn monitor(step: MonitorStep, source: io::Error) -> Self {
        DevError::Monitor { step, source }
    }
}

/// Result type for device plugin operations
pub type Result<T> = std::result::Result<T, DevError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_error_names_step() {
        let err = DevError::monitor(
            MonitorStep::Filter,
            io::Error::new(io::ErrorKind::InvalidInput, "bad filter"),
        );
        assert_eq!(err.to_string(), "Monitor filter failed: bad filter");
    }

    #[test]
    fn test_io_source_is_preserved() {
        use std::error::Error as _;

        let err = DevError::ServiceOpen(io::Error::from(io::ErrorKind::PermissionDenied));
        let source = err.source().expect("source");
        assert!(source.downcast_ref::<io::Error>().is_some());
    }
}
