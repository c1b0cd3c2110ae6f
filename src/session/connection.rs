//! Individual client session handling

use crate::command::CommandDispatcher;
use crate::transport::TransportStream;
use pcremote_shared::codec::{self, CodecError, LineDecoder};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Errors that end a session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed stream: {0}")]
    Codec(#[from] CodecError),
}

/// How a session ended
#[derive(Debug)]
pub enum SessionExit {
    /// Peer closed the connection
    Disconnected { commands: u64 },
    /// Read, write or framing failure
    Failed(SessionError),
}

/// One accepted client connection
pub struct ClientSession<S> {
    id: u64,
    peer: String,
    stream: S,
    dispatcher: Arc<CommandDispatcher>,
    decoder: LineDecoder,
    read_buf: Vec<u8>,
    commands: u64,
}

impl<S: TransportStream> ClientSession<S> {
    /// Create a new session from an accepted stream
    pub fn new(
        id: u64,
        peer: String,
        stream: S,
        dispatcher: Arc<CommandDispatcher>,
        max_line_len: usize,
    ) -> Self {
        Self {
            id,
            peer,
            stream,
            dispatcher,
            decoder: LineDecoder::with_max_len(max_line_len),
            read_buf: vec![0u8; 1024],
            commands: 0,
        }
    }

    /// Run the read-dispatch-write loop until the client goes away
    ///
    /// The stream is shut down and dropped whichever way the loop ends.
    pub async fn run(mut self) -> SessionExit {
        info!("[SESSION {}] Client connected: {}", self.id, self.peer);

        let exit = match self.serve().await {
            Ok(()) => SessionExit::Disconnected {
                commands: self.commands,
            },
            Err(e) => SessionExit::Failed(e),
        };

        if let Err(e) = self.stream.shutdown().await {
            debug!("[SESSION {}] Shutdown error: {}", self.id, e);
        }
        match &exit {
            SessionExit::Disconnected { commands } => info!(
                "[SESSION {}] Client disconnected: {} ({} command(s))",
                self.id, self.peer, commands
            ),
            SessionExit::Failed(e) => warn!(
                "[SESSION {}] Error handling {}, closing: {}",
                self.id, self.peer, e
            ),
        }
        exit
    }

    async fn serve(&mut self) -> Result<(), SessionError> {
        loop {
            let Some(line) = self.next_line().await? else {
                return Ok(());
            };

            let command = line.trim();
            info!("[SESSION {}] Received command: {}", self.id, command);

            let response = self.dispatcher.dispatch(command).await;
            let encoded = codec::encode(&response)?;
            self.stream.write_all(&encoded).await?;
            self.stream.flush().await?;
            self.commands += 1;

            info!(
                "[SESSION {}] Response sent: {:?} {}",
                self.id, response.status, response.message
            );
        }
    }

    /// Read the next request line
    /// Returns None once the peer has closed and nothing is left
    async fn next_line(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            if let Some(line) = self.decoder.decode_next()? {
                return Ok(Some(line));
            }

            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                return Ok(self.decoder.finish()?);
            }
            self.decoder.extend(&self.read_buf[..n]);
        }
    }
}
