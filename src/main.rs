mod action;
mod cli;
mod command;
mod config;
mod platform;
mod server;
mod session;
mod transport;

use action::ActionProvider;
use clap::Parser;
use cli::Cli;
use command::CommandDispatcher;
use platform::Platform;
use server::Server;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = cli.server_config();
    let platform = Platform::detect();

    info!("=== PC Remote Control Service ===");
    info!("Starting service on {}", platform);
    info!("  Transport: {}", config.transport);
    info!("  Service: {}", config.identity.name);

    let dispatcher = CommandDispatcher::new(ActionProvider::system(platform));
    let server = Arc::new(Server::new(config, dispatcher));

    // Stop accepting on Ctrl-C
    let server_clone = server.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Service stopped by user");
                server_clone.stop();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    if let Err(e) = server.start().await {
        error!("Failed to start server: {}", e);
        return Err(e.into());
    }
    Ok(())
}

/// Log to stdout, and to `log_file` as well when given
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(file_layer)
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
    Ok(())
}
