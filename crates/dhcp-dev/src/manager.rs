//! Device plugin manager
//!
//! Keeps the set of plugins the daemon was built with and loads at most one
//! of them. With no plugin loaded the daemon treats every interface as
//! initialized and relies on its own link monitoring.

use crate::config::DevConfig;
use crate::eloop::InterfaceHandler;
use crate::error::{DevError, Result};
use crate::metrics::EventMetrics;
use crate::plugin::DevicePlugin;
use crate::types::Dispatch;
use log::{error, info, warn};
use std::os::unix::io::RawFd;

/// Device plugin manager
pub struct DeviceManager {
    /// Registered plugins, in the order they are tried
    plugins: Vec<Box<dyn DevicePlugin>>,

    /// Index of the loaded plugin
    active: Option<usize>,

    config: DevConfig,
}

impl DeviceManager {
    /// Create a new device manager
    pub fn new(config: DevConfig) -> Self {
        DeviceManager {
            plugins: Vec::new(),
            active: None,
            config,
        }
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Box<dyn DevicePlugin>) -> Result<()> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(DevError::PluginAlreadyRegistered(plugin.name().to_string()));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Names of all registered plugins
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    /// Name of the loaded plugin
    pub fn active(&self) -> Option<&str> {
        self.active_plugin().map(|p| p.name())
    }

    /// Load a plugin and start it
    ///
    /// `preferred` overrides the configured plugin. Without either, plugins
    /// are tried in registration order and the first to start wins.
    pub fn start(&mut self, preferred: Option<&str>) -> Result<RawFd> {
        if let Some(name) = self.active() {
            error!("{}: already started", name);
            return Err(DevError::AlreadyStarted(name.to_string()));
        }

        if !self.config.enabled {
            return Err(DevError::Disabled);
        }

        let wanted = preferred
            .map(str::to_string)
            .or_else(|| self.config.plugin.clone());

        if let Some(name) = wanted {
            let index = self
                .plugins
                .iter()
                .position(|p| p.name() == name)
                .ok_or(DevError::PluginNotFound(name))?;
            return self.start_plugin(index);
        }

        let mut last_error = None;
        for index in 0..self.plugins.len() {
            match self.start_plugin(index) {
                Ok(fd) => return Ok(fd),
                Err(e) => {
                    warn!("dev: {}: {}", self.plugins[index].name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(DevError::NoPlugins))
    }

    fn start_plugin(&mut self, index: usize) -> Result<RawFd> {
        let plugin = &mut self.plugins[index];
        let fd = plugin.start()?;

        info!("dev: loaded {}", plugin.name());
        self.active = Some(index);
        Ok(fd)
    }

    /// Stop and unload the active plugin
    pub fn stop(&mut self) {
        if let Some(index) = self.active.take() {
            let plugin = &mut self.plugins[index];
            info!("dev: unloading {}", plugin.name());
            plugin.stop();
        }
    }

    /// Check whether a plugin is monitoring devices
    pub fn listening(&self) -> bool {
        self.active_plugin().is_some_and(|p| p.listening())
    }

    /// Check whether an interface is ready to be configured
    ///
    /// Always true when no plugin is loaded.
    pub fn initialized(&self, ifname: &str) -> bool {
        match self.active_plugin() {
            Some(plugin) => plugin.settled(ifname),
            None => true,
        }
    }

    /// Handle one pending event on the active plugin
    pub fn handle_data(&mut self, handler: &mut dyn InterfaceHandler) -> Dispatch {
        match self.active {
            Some(index) => self.plugins[index].handle_data(handler),
            None => Dispatch::Empty,
        }
    }

    /// Event counters of the active plugin
    pub fn metrics(&self) -> Option<&EventMetrics> {
        self.active_plugin().and_then(|p| p.metrics())
    }

    fn active_plugin(&self) -> Option<&dyn DevicePlugin> {
        self.active.map(|index| self.plugins[index].as_ref())
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new(DevConfig::default())
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        self.stop();
    }
}
