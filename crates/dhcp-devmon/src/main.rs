//! dhcp-devmon - network interface hotplug monitor
//!
//! Loads a device plugin and logs network interfaces as the host adds,
//! renames and removes them, together with whether each new interface has
//! been fully initialized.

mod config;
mod eloop;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, LoggingConfig};
use dhcp_dev::{DevConfig, DeviceManager, Dispatch, InterfaceChange, InterfaceHandler, Token};
use eloop::TokioEventLoop;
use std::collections::BTreeSet;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dhcp-devmon")]
#[command(about = "Watch network interfaces come and go through the host device manager")]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "DHCP_DEVMON_CONFIG")]
    config: Option<PathBuf>,

    /// Device plugin to load
    #[arg(short, long)]
    plugin: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Report whether an interface is settled and exit
    #[arg(long, value_name = "IFNAME")]
    check: Option<String>,
}

/// Tracks interfaces reported by the device plugin
#[derive(Debug, Default)]
struct InterfaceTracker {
    /// Interfaces currently present
    present: BTreeSet<String>,

    /// Arrivals not yet checked for initialization
    arrived: Vec<String>,
}

impl InterfaceHandler for InterfaceTracker {
    fn handle_interface(&mut self, change: InterfaceChange, ifname: &str) {
        match change {
            InterfaceChange::Present => {
                info!(ifname, "interface present");
                self.present.insert(ifname.to_string());
                self.arrived.push(ifname.to_string());
            }
            InterfaceChange::Gone => {
                info!(ifname, "interface gone");
                self.present.remove(ifname);
            }
        }
    }
}

impl InterfaceTracker {
    /// Log settle state of new arrivals
    fn check_arrivals(&mut self, manager: &DeviceManager) {
        for ifname in self.arrived.drain(..) {
            if manager.initialized(&ifname) {
                info!(ifname = %ifname, "interface settled");
            } else {
                info!(ifname = %ifname, "interface waiting for udev");
            }
        }
    }
}

fn init_logging(logging: &LoggingConfig, debug: bool) {
    let level = if debug { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "udev")]
fn register_plugins(
    manager: &mut DeviceManager,
    eloop: &TokioEventLoop,
    config: &DevConfig,
) -> Result<()> {
    let plugin = dhcp_dev::LibudevPlugin::system(eloop.clone(), config);
    manager
        .register(Box::new(plugin))
        .context("Failed to register udev plugin")
}

#[cfg(not(feature = "udev"))]
fn register_plugins(
    _manager: &mut DeviceManager,
    _eloop: &TokioEventLoop,
    _config: &DevConfig,
) -> Result<()> {
    debug!("built without device plugins");
    Ok(())
}

/// Start the manager just long enough to answer the settle query
fn check(manager: &mut DeviceManager, plugin: Option<&str>, ifname: &str) -> bool {
    if let Err(e) = manager.start(plugin) {
        debug!("device plugin unavailable: {}", e);
    }
    let settled = manager.initialized(ifname);
    manager.stop();
    settled
}

/// Watch for interface changes until `shutdown` resolves
///
/// `shutdown` is polled across loop iterations, so a signal arriving while
/// events are being drained is still seen on the next pass.
async fn run(
    manager: &mut DeviceManager,
    eloop: &TokioEventLoop,
    plugin: Option<&str>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let fd = match manager.start(plugin) {
        Ok(fd) => fd,
        Err(e) => {
            warn!("device monitoring unavailable: {}", e);
            return Ok(());
        }
    };
    let name = manager.active().unwrap_or_default().to_string();
    if eloop.is_empty() {
        anyhow::bail!("{} did not register descriptor {}", name, fd);
    }
    info!(fd, plugin = %name, watched = eloop.len(), "monitoring network interfaces");

    let mut tracker = InterfaceTracker::default();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            ready = eloop.readable() => {
                let token = ready.context("Event loop failed")?;
                if token == Token::DEVICE {
                    while manager.handle_data(&mut tracker) == Dispatch::Handled {}
                    tracker.check_arrivals(manager);
                }
            }
            _ = &mut shutdown => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    if let Some(metrics) = manager.metrics() {
        info!(
            events = metrics.events_received,
            present = metrics.interfaces_present,
            gone = metrics.interfaces_gone,
            ignored = metrics.ignored_actions + metrics.foreign_subsystem,
            "device events handled"
        );
    }
    debug!(interfaces = ?tracker.present, "known interfaces at shutdown");
    manager.stop();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    init_logging(&config.logging, args.debug);

    let eloop = TokioEventLoop::new();
    let mut manager = DeviceManager::new(config.dev.clone());
    register_plugins(&mut manager, &eloop, &config.dev)?;

    if let Some(ifname) = args.check.as_deref() {
        let settled = check(&mut manager, args.plugin.as_deref(), ifname);
        println!("{}: {}", ifname, if settled { "settled" } else { "not settled" });
        return Ok(if settled {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
        }
    };
    run(&mut manager, &eloop, args.plugin.as_deref(), shutdown).await?;
    Ok(ExitCode::SUCCESS)
}
