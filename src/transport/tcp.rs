//! TCP transport for development and testing

use crate::config::{ServiceIdentity, TransportKind};
use crate::transport::traits::TransportListener;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

/// TCP listener implementing TransportListener
pub struct TcpTransportListener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl TcpTransportListener {
    /// Bind to the given address
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let inner = TcpListener::bind(addr).await?;
        let local_addr = inner.local_addr()?;
        Ok(Self { inner, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl TransportListener for TcpTransportListener {
    type Stream = TcpStream;

    async fn advertise(&mut self, identity: &ServiceIdentity) -> io::Result<()> {
        // No discovery over plain TCP; clients need the address.
        info!(
            "[TCP] '{}' reachable at {} (no discovery over TCP)",
            identity.name, self.local_addr
        );
        Ok(())
    }

    async fn accept(&mut self) -> io::Result<(Self::Stream, String)> {
        let (stream, addr) = self.inner.accept().await?;
        Ok((stream, addr.to_string()))
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Tcp
    }

    fn local_endpoint(&self) -> String {
        self.local_addr().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_accept_reports_peer() {
        let mut listener = TcpTransportListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .expect("bind failed");
        assert_eq!(listener.kind(), TransportKind::Tcp);
        let addr = listener.local_addr();
        assert_ne!(addr.port(), 0);

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.expect("connect failed");
            stream.write_all(b"ping").await.expect("write failed");
            stream.local_addr().expect("local addr")
        });

        let (mut stream, peer) = listener.accept().await.expect("accept failed");
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await.expect("read failed");
        assert_eq!(&buf, b"ping");

        let client_addr = client.await.unwrap();
        assert_eq!(peer, client_addr.to_string());
    }
}
