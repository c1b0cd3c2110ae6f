//! Transport trait abstraction for pluggable listener backends

use crate::config::{ServiceIdentity, TransportKind};
use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};

/// A connected byte stream to one client
pub trait TransportStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T> TransportStream for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

/// A bound endpoint that hands out client connections
#[async_trait]
pub trait TransportListener: Send + 'static {
    /// The stream type this listener produces
    type Stream: TransportStream;

    /// Make the endpoint discoverable under the given identity
    async fn advertise(&mut self, identity: &ServiceIdentity) -> io::Result<()>;

    /// Wait for the next client, returning its stream and a peer label
    async fn accept(&mut self) -> io::Result<(Self::Stream, String)>;

    /// Which configured transport this listener implements
    fn kind(&self) -> TransportKind;

    /// Where clients can reach this listener
    fn local_endpoint(&self) -> String;
}

/// Accept errors worth retrying; anything else means the listener is gone
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
