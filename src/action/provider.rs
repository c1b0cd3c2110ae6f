//! Action provider - turns an abstract action into host program runs

use super::mechanism::{mechanisms_for, Action};
use super::runner::{CommandRunner, MechanismError, SystemRunner};
use crate::platform::Platform;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why an action did not take effect
#[derive(Debug, Error)]
pub enum ActionError {
    /// No mechanism is mapped for this platform
    #[error("{} not supported on {}", .action.title(), .platform)]
    Unsupported { action: Action, platform: Platform },

    /// The only mapped mechanism failed
    #[error("Failed to execute {action} command")]
    Failed {
        action: Action,
        #[source]
        source: MechanismError,
    },

    /// Every mechanism in a fallback chain failed
    #[error("{}", .action.exhausted_message())]
    Exhausted {
        action: Action,
        failures: Vec<MechanismError>,
    },
}

/// Success message on `Ok`
pub type ActionResult = Result<&'static str, ActionError>;

/// Executes actions with the mechanisms mapped for one platform
pub struct ActionProvider {
    platform: Platform,
    runner: Arc<dyn CommandRunner>,
}

impl ActionProvider {
    /// Create a provider with a custom runner
    pub fn new(platform: Platform, runner: Arc<dyn CommandRunner>) -> Self {
        Self { platform, runner }
    }

    /// Create a provider that runs real host programs
    pub fn system(platform: Platform) -> Self {
        Self::new(platform, Arc::new(SystemRunner))
    }

    pub async fn shutdown(&self) -> ActionResult {
        self.perform(Action::Shutdown).await
    }

    pub async fn sleep(&self) -> ActionResult {
        self.perform(Action::Sleep).await
    }

    pub async fn lock(&self) -> ActionResult {
        self.perform(Action::Lock).await
    }

    /// Try each mapped mechanism in order, stopping at the first success
    pub async fn perform(&self, action: Action) -> ActionResult {
        let Some(chain) = mechanisms_for(&self.platform, action) else {
            warn!("[ACTION] {} not supported on {}", action, self.platform);
            return Err(ActionError::Unsupported {
                action,
                platform: self.platform.clone(),
            });
        };

        let mut failures = Vec::with_capacity(chain.len());
        for mechanism in chain {
            debug!("[ACTION] {}: trying `{}`", action, mechanism);
            match self.runner.run(mechanism).await {
                Ok(()) => {
                    info!("[ACTION] {} executed via `{}`", action, mechanism);
                    return Ok(action.success_message());
                }
                Err(e) if e.is_missing() => {
                    debug!("[ACTION] {}: mechanism unavailable: {}", action, e);
                    failures.push(e);
                }
                Err(e) => {
                    warn!("[ACTION] {}: mechanism failed: {}", action, e);
                    failures.push(e);
                }
            }
        }

        error!(
            "[ACTION] {} failed after {} mechanism(s)",
            action,
            failures.len()
        );
        if failures.len() == 1 {
            Err(ActionError::Failed {
                action,
                source: failures.remove(0),
            })
        } else {
            Err(ActionError::Exhausted { action, failures })
        }
    }
}
