//! Command-line interface for the service

use crate::config::{ServerConfig, ServiceIdentity, TransportKind, DEFAULT_TCP_BIND};
use clap::Parser;
use pcremote_shared::service::{DEFAULT_RFCOMM_CHANNEL, SERVICE_NAME};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Accepts shutdown, sleep and lock commands from a paired remote client.
#[derive(Parser, Debug)]
#[command(name = "pcremote", version)]
pub struct Cli {
    /// Listener backend.
    #[arg(long, value_enum, default_value_t = TransportKind::Rfcomm)]
    pub transport: TransportKind,
    /// RFCOMM channel to register.
    #[arg(long, default_value_t = DEFAULT_RFCOMM_CHANNEL)]
    pub channel: u8,
    /// Address to bind when using the TCP transport.
    #[arg(long, default_value = DEFAULT_TCP_BIND)]
    pub bind: SocketAddr,
    /// Advertised service name.
    #[arg(long, default_value = SERVICE_NAME)]
    pub name: String,
    /// Also append log output to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Build the server configuration from the parsed arguments
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            transport: self.transport,
            channel: self.channel,
            tcp_bind: self.bind,
            identity: ServiceIdentity {
                name: self.name.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
