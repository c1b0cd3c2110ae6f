//! Server configuration

use clap::ValueEnum;
use pcremote_shared::service::{
    DEFAULT_RFCOMM_CHANNEL, MAX_LINE_LEN, SERVICE_NAME, SERVICE_UUID_U128,
};
use std::fmt;
use std::net::SocketAddr;

/// Default TCP bind address
pub const DEFAULT_TCP_BIND: &str = "0.0.0.0:5050";

/// Which listener backend to serve on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportKind {
    /// Bluetooth RFCOMM via BlueZ
    #[default]
    Rfcomm,
    /// Plain TCP, for development
    Tcp,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Rfcomm => write!(f, "rfcomm"),
            TransportKind::Tcp => write!(f, "tcp"),
        }
    }
}

/// Name and UUID clients look for during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub uuid: u128,
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            name: SERVICE_NAME.into(),
            uuid: SERVICE_UUID_U128,
        }
    }
}

/// Configuration for the command server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener backend
    pub transport: TransportKind,
    /// RFCOMM channel number
    pub channel: u8,
    /// TCP bind address (when transport is Tcp)
    pub tcp_bind: SocketAddr,
    /// Advertised identity
    pub identity: ServiceIdentity,
    /// Longest accepted request line
    pub max_line_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            channel: DEFAULT_RFCOMM_CHANNEL,
            tcp_bind: SocketAddr::from(([0, 0, 0, 0], 5050)),
            identity: ServiceIdentity::default(),
            max_line_len: MAX_LINE_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.transport, TransportKind::Rfcomm);
        assert_eq!(config.channel, 1);
        assert_eq!(config.tcp_bind.to_string(), DEFAULT_TCP_BIND);
        assert_eq!(config.identity.name, "PC Remote Control Service");
        assert_eq!(config.max_line_len, 1024);
    }
}
