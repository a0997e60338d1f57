//! Device monitoring configuration

use serde::{Deserialize, Serialize};

/// Device monitoring configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevConfig {
    /// Load a device plugin at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Plugin to load instead of trying each one in turn
    #[serde(default)]
    pub plugin: Option<String>,

    /// Ask the device service to filter on the network subsystem. Events are
    /// still checked after receipt.
    #[serde(default = "default_subsystem_filter")]
    pub subsystem_filter: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_subsystem_filter() -> bool {
    true
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            plugin: None,
            subsystem_filter: default_subsystem_filter(),
        }
    }
}
