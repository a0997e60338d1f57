//! Readiness loop on the tokio current-thread runtime

use dhcp_dev::{Registry, Token};
use futures::future::select_all;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::rc::Rc;
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;
use tracing::trace;

/// Borrowed descriptor; the owner closes it
struct Descriptor(RawFd);

impl AsRawFd for Descriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

struct Watch {
    token: Token,
    fd: Rc<AsyncFd<Descriptor>>,
}

/// Event loop handing out readable tokens
///
/// Cloning gives another handle onto the same set of watched descriptors.
/// Must be used from within a tokio runtime.
#[derive(Clone, Default)]
pub struct TokioEventLoop {
    watches: Rc<RefCell<HashMap<RawFd, Watch>>>,
}

impl TokioEventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of watched descriptors
    pub fn len(&self) -> usize {
        self.watches.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.borrow().is_empty()
    }

    /// Wait until a watched descriptor is readable and return its token
    ///
    /// Readiness is cleared before returning, so the caller must drain the
    /// descriptor. Never resolves while nothing is watched.
    pub async fn readable(&self) -> io::Result<Token> {
        let watches: Vec<(Token, Rc<AsyncFd<Descriptor>>)> = self
            .watches
            .borrow()
            .values()
            .map(|w| (w.token, w.fd.clone()))
            .collect();

        if watches.is_empty() {
            return std::future::pending().await;
        }

        let waits = watches.iter().map(|(_, fd)| Box::pin(fd.readable()));
        let (ready, index, _) = select_all(waits).await;

        let mut guard = ready?;
        guard.clear_ready();
        Ok(watches[index].0)
    }
}

impl Registry for TokioEventLoop {
    fn add_reader(&self, fd: RawFd, token: Token) -> io::Result<()> {
        let mut watches = self.watches.borrow_mut();
        if watches.contains_key(&fd) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("descriptor {} already watched", fd),
            ));
        }

        let async_fd = AsyncFd::with_interest(Descriptor(fd), Interest::READABLE)?;
        watches.insert(
            fd,
            Watch {
                token,
                fd: Rc::new(async_fd),
            },
        );
        trace!(fd, "watching descriptor");
        Ok(())
    }

    fn remove_reader(&self, fd: RawFd) {
        if self.watches.borrow_mut().remove(&fd).is_some() {
            trace!(fd, "stopped watching descriptor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::os::unix::net::UnixStream;
    use std::time::Duration;
    use tokio::time::timeout;

    fn pair() -> (UnixStream, UnixStream) {
        let (a, b) = UnixStream::pair().unwrap();
        a.set_nonblocking(true).unwrap();
        b.set_nonblocking(true).unwrap();
        (a, b)
    }

    #[tokio::test]
    async fn test_readable_reports_token() {
        let eloop = TokioEventLoop::new();
        let (mut reader, mut writer) = pair();

        eloop.add_reader(reader.as_raw_fd(), Token::DEVICE).unwrap();
        assert_eq!(eloop.len(), 1);

        writer.write_all(b"x").unwrap();
        let token = timeout(Duration::from_secs(5), eloop.readable())
            .await
            .expect("descriptor should become readable")
            .unwrap();
        assert_eq!(token, Token::DEVICE);

        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf).unwrap();
    }

    #[tokio::test]
    async fn test_picks_the_ready_descriptor() {
        let eloop = TokioEventLoop::new();
        let (quiet, _quiet_peer) = pair();
        let (busy, mut busy_peer) = pair();

        eloop.add_reader(quiet.as_raw_fd(), Token(1)).unwrap();
        eloop.add_reader(busy.as_raw_fd(), Token(2)).unwrap();

        busy_peer.write_all(b"x").unwrap();
        let token = timeout(Duration::from_secs(5), eloop.readable())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(token, Token(2));
    }

    #[tokio::test]
    async fn test_duplicate_descriptor_rejected() {
        let eloop = TokioEventLoop::new();
        let (reader, _writer) = pair();

        eloop.add_reader(reader.as_raw_fd(), Token(1)).unwrap();
        let err = eloop.add_reader(reader.as_raw_fd(), Token(2)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_removed_descriptor_is_not_reported() {
        let eloop = TokioEventLoop::new();
        let (reader, mut writer) = pair();

        eloop.add_reader(reader.as_raw_fd(), Token::DEVICE).unwrap();
        eloop.remove_reader(reader.as_raw_fd());
        eloop.remove_reader(reader.as_raw_fd());
        assert!(eloop.is_empty());

        writer.write_all(b"x").unwrap();
        assert!(timeout(Duration::from_millis(50), eloop.readable())
            .await
            .is_err());
    }
}
