//! Device service backends

#[cfg(feature = "udev")]
pub mod libudev;

#[cfg(feature = "udev")]
pub use libudev::{LibudevPlugin, UdevBackend, UdevMonitor};
