//! Command server - accepts clients and spawns a session for each
//!
//! The server owns the listening endpoint only. Sessions are detached tasks:
//! stopping the server ends the accept loop but lets open sessions finish.

use crate::command::CommandDispatcher;
use crate::config::{ServerConfig, TransportKind};
use crate::session::ClientSession;
use crate::transport::{is_transient, TcpTransportListener, TransportListener};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Errors that prevent the server from serving
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {transport} listener: {source}")]
    Bind {
        transport: TransportKind,
        #[source]
        source: io::Error,
    },

    #[error("failed to advertise {transport} listener: {source}")]
    Advertise {
        transport: TransportKind,
        #[source]
        source: io::Error,
    },

    #[cfg_attr(target_os = "linux", allow(dead_code))]
    #[error("{0} transport is not available on this platform")]
    Unavailable(TransportKind),
}

/// Process-wide server state
pub struct Server {
    config: ServerConfig,
    dispatcher: Arc<CommandDispatcher>,
    running: AtomicBool,
    shutdown: watch::Sender<bool>,
    next_session_id: AtomicU64,
}

impl Server {
    /// Create a new server
    pub fn new(config: ServerConfig, dispatcher: CommandDispatcher) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
            running: AtomicBool::new(false),
            shutdown,
            next_session_id: AtomicU64::new(0),
        }
    }

    /// True while the accept loop is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Bind the configured transport and serve until stopped
    pub async fn start(&self) -> Result<(), ServerError> {
        let kind = self.config.transport;
        match kind {
            TransportKind::Tcp => {
                let listener = TcpTransportListener::bind(self.config.tcp_bind)
                    .await
                    .map_err(|source| ServerError::Bind {
                        transport: kind,
                        source,
                    })?;
                self.serve(listener).await
            }
            #[cfg(target_os = "linux")]
            TransportKind::Rfcomm => {
                let listener = crate::transport::RfcommListener::bind(self.config.channel)
                    .await
                    .map_err(|source| ServerError::Bind {
                        transport: kind,
                        source,
                    })?;
                self.serve(listener).await
            }
            #[cfg(not(target_os = "linux"))]
            TransportKind::Rfcomm => Err(ServerError::Unavailable(kind)),
        }
    }

    /// Advertise the listener, then accept clients until stopped
    pub async fn serve<L: TransportListener>(&self, mut listener: L) -> Result<(), ServerError> {
        listener
            .advertise(&self.config.identity)
            .await
            .map_err(|source| ServerError::Advertise {
                transport: listener.kind(),
                source,
            })?;

        let mut shutdown = self.shutdown.subscribe();
        self.running.store(true, Ordering::SeqCst);
        info!(
            "[SERVER] {} listener on {}, waiting for connections...",
            listener.kind(),
            listener.local_endpoint()
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = shutdown.changed() => {}
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let id = self.next_session_id.fetch_add(1, Ordering::SeqCst) + 1;
                        info!("[SERVER] Accepted connection from {} (session {})", peer, id);
                        let session = ClientSession::new(
                            id,
                            peer,
                            stream,
                            self.dispatcher.clone(),
                            self.config.max_line_len,
                        );
                        tokio::spawn(session.run());
                    }
                    Err(e) if is_transient(&e) => {
                        warn!("[SERVER] Accept failed, continuing: {}", e);
                    }
                    Err(e) => {
                        error!("[SERVER] Listener closed: {}", e);
                        break;
                    }
                },
            }
        }

        self.running.store(false, Ordering::SeqCst);
        drop(listener);
        info!("[SERVER] Server stopped");
        Ok(())
    }

    /// Close the listener; safe to call any number of times
    ///
    /// Sessions already running are not interrupted.
    pub fn stop(&self) {
        if !self.shutdown.send_replace(true) {
            info!("[SERVER] Stop requested");
        }
        self.running.store(false, Ordering::SeqCst);
    }
}
