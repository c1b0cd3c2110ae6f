//! Runs mechanisms as external processes

use super::mechanism::Mechanism;
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;

/// Why a single mechanism did not succeed
#[derive(Debug, Error)]
pub enum MechanismError {
    /// The program is not installed or not on PATH
    #[error("{program}: not found")]
    NotFound { program: String },

    /// The program ran but did not exit cleanly
    #[error("{program}: {status}")]
    Failed { program: String, status: String },

    /// The program could not be started for another reason
    #[error("{program}: failed to start: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl MechanismError {
    /// True when the mechanism is absent rather than present-but-failing
    pub fn is_missing(&self) -> bool {
        matches!(self, MechanismError::NotFound { .. })
    }

    fn from_spawn(program: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            MechanismError::NotFound {
                program: program.to_string(),
            }
        } else {
            MechanismError::Spawn {
                program: program.to_string(),
                source: err,
            }
        }
    }

    fn from_status(program: &str, status: ExitStatus) -> Self {
        MechanismError::Failed {
            program: program.to_string(),
            status: status.to_string(),
        }
    }
}

/// Executes one mechanism to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, mechanism: &Mechanism) -> Result<(), MechanismError>;
}

/// Spawns the real host program and waits for it
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, mechanism: &Mechanism) -> Result<(), MechanismError> {
        let status = Command::new(mechanism.program)
            .args(mechanism.args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| MechanismError::from_spawn(mechanism.program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(MechanismError::from_status(mechanism.program, status))
        }
    }
}
