//! Host daemon collaborator traits
//!
//! The event loop and the interface-configuration logic live in the host
//! daemon. Device plugins only see them through these two traits.

use crate::types::InterfaceChange;
use std::io;
use std::os::unix::io::RawFd;
use std::rc::Rc;

/// Identifies which handler a readable descriptor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(pub usize);

impl Token {
    /// Token used by device plugins for their monitor descriptor
    pub const DEVICE: Token = Token(0x6465_7600);
}

/// Handle onto the host event loop
///
/// Methods take `&self` so plugins can hold a handle and deregister from
/// `Drop`.
pub trait Registry {
    /// Watch `fd` for readability and report it under `token`
    fn add_reader(&self, fd: RawFd, token: Token) -> io::Result<()>;

    /// Stop watching `fd`
    fn remove_reader(&self, fd: RawFd);
}

impl<R: Registry + ?Sized> Registry for Rc<R> {
    fn add_reader(&self, fd: RawFd, token: Token) -> io::Result<()> {
        (**self).add_reader(fd, token)
    }

    fn remove_reader(&self, fd: RawFd) {
        (**self).remove_reader(fd)
    }
}

impl<R: Registry + ?Sized> Registry for &R {
    fn add_reader(&self, fd: RawFd, token: Token) -> io::Result<()> {
        (**self).add_reader(fd, token)
    }

    fn remove_reader(&self, fd: RawFd) {
        (**self).remove_reader(fd)
    }
}

/// Daemon callback for interface arrival and departure
pub trait InterfaceHandler {
    fn handle_interface(&mut self, change: InterfaceChange, ifname: &str);
}

impl<F> InterfaceHandler for F
where
    F: FnMut(InterfaceChange, &str),
{
    fn handle_interface(&mut self, change: InterfaceChange, ifname: &str) {
        self(change, ifname)
    }
}
